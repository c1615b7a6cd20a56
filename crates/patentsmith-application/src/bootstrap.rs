//! Wires configuration, the HTTP backend and the JSON store into a
//! ready-to-use [`PatentAssistant`].

use crate::patent_assistant::PatentAssistant;
use crate::prompt_templates::DefaultPromptTemplates;
use patentsmith_core::config::{AppConfig, ProviderConfig};
use patentsmith_core::error::{PatentError, Result};
use patentsmith_infrastructure::JsonPatentRepository;
use patentsmith_interaction::{CompletionGateway, OpenAiCompatibleBackend, find_preset};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Base URL from the explicit override, else from the named preset.
pub fn resolve_base_url(provider: &ProviderConfig) -> Result<String> {
    if let Some(url) = provider.base_url.as_deref().map(str::trim).filter(|u| !u.is_empty()) {
        return Ok(url.to_string());
    }

    match find_preset(&provider.name) {
        Some(preset) if !preset.base_url.is_empty() => Ok(preset.base_url.to_string()),
        Some(_) => Err(PatentError::config(format!(
            "provider '{}' requires provider.base_url",
            provider.name
        ))),
        None => Err(PatentError::config(format!(
            "unknown provider '{}'; set provider.base_url or use a predefined provider",
            provider.name
        ))),
    }
}

/// Builds an assistant that stores documents in `data_file`.
pub fn build_assistant(config: &AppConfig, api_key: String, data_file: PathBuf) -> Result<PatentAssistant> {
    config.validate()?;
    let base_url = resolve_base_url(&config.provider)?;

    let backend = OpenAiCompatibleBackend::with_timeout(
        base_url.as_str(),
        api_key,
        config.provider.model.as_str(),
        Duration::from_secs(config.provider.timeout_secs),
    )
    .map_err(|e| PatentError::Completion(e.to_string()))?;

    let gateway = CompletionGateway::new(Arc::new(backend))
        .with_max_retries(config.generation.max_retries)
        .with_max_tokens(config.generation.max_tokens);

    info!(
        provider = %config.provider.name,
        model = %config.provider.model,
        base_url = %base_url,
        data_file = %data_file.display(),
        "patent assistant ready"
    );

    Ok(PatentAssistant::new(
        gateway,
        Arc::new(DefaultPromptTemplates::new()?),
        Arc::new(JsonPatentRepository::open(data_file)),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn base_url_override_wins() {
        let provider = ProviderConfig {
            base_url: Some("http://localhost:8080/v1".to_string()),
            ..ProviderConfig::default()
        };
        assert_eq!(resolve_base_url(&provider).unwrap(), "http://localhost:8080/v1");
    }

    #[test]
    fn base_url_from_preset() {
        let provider = ProviderConfig {
            name: "deepseek".to_string(),
            ..ProviderConfig::default()
        };
        assert_eq!(resolve_base_url(&provider).unwrap(), "https://api.deepseek.com/v1/");
    }

    #[test]
    fn custom_provider_requires_base_url() {
        let provider = ProviderConfig {
            name: "Custom".to_string(),
            ..ProviderConfig::default()
        };
        assert!(resolve_base_url(&provider).unwrap_err().is_config());

        let unknown = ProviderConfig {
            name: "Nobody".to_string(),
            ..ProviderConfig::default()
        };
        assert!(resolve_base_url(&unknown).unwrap_err().is_config());
    }

    #[tokio::test]
    async fn build_assistant_opens_empty_store() {
        let temp_dir = TempDir::new().unwrap();
        let data_file = temp_dir.path().join("patents.json");

        let assistant =
            build_assistant(&AppConfig::default(), "test-key".to_string(), data_file.clone()).unwrap();

        assert!(assistant.list_patents().await.is_empty());
        let info = assistant.data_file_info();
        assert_eq!(info.path, data_file);
        assert!(!info.exists);
    }

    #[test]
    fn build_assistant_rejects_invalid_config() {
        let temp_dir = TempDir::new().unwrap();
        let mut config = AppConfig::default();
        config.generation.idea_workers = 0;

        let result = build_assistant(&config, "k".to_string(), temp_dir.path().join("p.json"));
        assert!(matches!(result, Err(e) if e.is_config()));
    }
}
