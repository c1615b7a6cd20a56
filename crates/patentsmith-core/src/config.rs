//! Application configuration model (`config.toml`).

use crate::error::{PatentError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_PROVIDER: &str = "Google Gemini";
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash-exp";

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub generation: GenerationConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

impl AppConfig {
    /// Parses a `config.toml` document. Missing sections fall back to defaults.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let generation = &self.generation;
        if generation.idea_workers == 0 {
            return Err(PatentError::config("generation.idea_workers must be at least 1"));
        }
        if generation.patent_workers == 0 {
            return Err(PatentError::config("generation.patent_workers must be at least 1"));
        }
        if generation.max_retries == 0 {
            return Err(PatentError::config("generation.max_retries must be at least 1"));
        }
        if self.provider.model.trim().is_empty() {
            return Err(PatentError::config("provider.model must not be empty"));
        }
        Ok(())
    }
}

/// Which OpenAI-compatible endpoint to talk to.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct ProviderConfig {
    /// Name of a predefined provider, or "Custom".
    #[serde(default = "default_provider")]
    pub name: String,
    /// Overrides the preset base URL. Required for "Custom".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            name: default_provider(),
            base_url: None,
            model: default_model(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Worker pool sizes, temperatures and retry policy.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct GenerationConfig {
    #[serde(default = "default_idea_workers")]
    pub idea_workers: usize,
    #[serde(default = "default_patent_workers")]
    pub patent_workers: usize,
    #[serde(default = "default_idea_temperature")]
    pub idea_temperature: f32,
    #[serde(default = "default_patent_temperature")]
    pub patent_temperature: f32,
    #[serde(default = "default_optimize_temperature")]
    pub optimize_temperature: f32,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            idea_workers: default_idea_workers(),
            patent_workers: default_patent_workers(),
            idea_temperature: default_idea_temperature(),
            patent_temperature: default_patent_temperature(),
            optimize_temperature: default_optimize_temperature(),
            max_retries: default_max_retries(),
            max_tokens: None,
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct StorageConfig {
    /// Durable store file. Defaults to `<data_dir>/patentsmith/patents.json`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_file: Option<PathBuf>,
}

/// API credentials kept apart from `config.toml` (`secret.json`).
#[derive(Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct SecretConfig {
    #[serde(default)]
    pub api_key: String,
}

impl std::fmt::Debug for SecretConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretConfig")
            .field("api_key", &"<redacted>")
            .finish()
    }
}

fn default_provider() -> String {
    DEFAULT_PROVIDER.to_string()
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_timeout_secs() -> u64 {
    120
}

fn default_idea_workers() -> usize {
    3
}

fn default_patent_workers() -> usize {
    2
}

fn default_idea_temperature() -> f32 {
    0.8
}

fn default_patent_temperature() -> f32 {
    0.7
}

fn default_optimize_temperature() -> f32 {
    0.6
}

fn default_max_retries() -> u32 {
    3
}
