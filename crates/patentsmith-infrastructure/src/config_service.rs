//! Loads `config.toml` and the API key.
//!
//! Configuration priority for the API key: `PATENTSMITH_API_KEY` > secret.json.

use crate::paths::PatentsmithPaths;
use patentsmith_core::config::{AppConfig, SecretConfig};
use patentsmith_core::error::{PatentError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const API_KEY_ENV: &str = "PATENTSMITH_API_KEY";

/// File-backed configuration source.
pub struct ConfigService {
    config_path: PathBuf,
    secret_path: PathBuf,
}

impl ConfigService {
    /// Uses the platform config directory.
    pub fn new() -> Result<Self> {
        Ok(Self {
            config_path: PatentsmithPaths::config_file()?,
            secret_path: PatentsmithPaths::secret_file()?,
        })
    }

    /// Creates a service with custom paths (for testing).
    pub fn with_paths(config_path: PathBuf, secret_path: PathBuf) -> Self {
        Self {
            config_path,
            secret_path,
        }
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Reads `config.toml`; a missing file yields the defaults.
    pub fn load_config(&self) -> Result<AppConfig> {
        if !self.config_path.exists() {
            debug!(path = %self.config_path.display(), "no config file, using defaults");
            return Ok(AppConfig::default());
        }

        let content = fs::read_to_string(&self.config_path)?;
        AppConfig::from_toml_str(&content)
    }

    /// Resolves the API key from the environment, then from secret.json.
    pub fn load_api_key(&self) -> Result<String> {
        if let Ok(key) = std::env::var(API_KEY_ENV) {
            if !key.trim().is_empty() {
                return Ok(key);
            }
        }
        self.load_api_key_from_file()
    }

    fn load_api_key_from_file(&self) -> Result<String> {
        if !self.secret_path.exists() {
            return Err(PatentError::config(format!(
                "API key not found: set {} or create {}",
                API_KEY_ENV,
                self.secret_path.display()
            )));
        }

        let content = fs::read_to_string(&self.secret_path)?;
        let secret: SecretConfig = serde_json::from_str(&content)?;
        if secret.api_key.trim().is_empty() {
            return Err(PatentError::config(format!(
                "api_key is empty in {}",
                self.secret_path.display()
            )));
        }
        Ok(secret.api_key)
    }

    /// The store file configured in `[storage]`, or the platform default.
    pub fn data_file(&self, config: &AppConfig) -> Result<PathBuf> {
        match &config.storage.data_file {
            Some(path) => Ok(path.clone()),
            None => Ok(PatentsmithPaths::default_data_file()?),
        }
    }

    /// Writes a commented default `config.toml` if none exists.
    /// Returns `true` when a file was created.
    pub fn ensure_config_file(&self) -> Result<bool> {
        if self.config_path.exists() {
            return Ok(false);
        }
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let body = toml::to_string_pretty(&AppConfig::default())
            .map_err(|e| PatentError::config(format!("Failed to render default config: {}", e)))?;
        fs::write(
            &self.config_path,
            format!("# patentsmith configuration\n\n{}", body),
        )?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn service(dir: &TempDir) -> ConfigService {
        ConfigService::with_paths(dir.path().join("config.toml"), dir.path().join("secret.json"))
    }

    #[test]
    fn test_missing_config_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config = service(&temp_dir).load_config().unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_load_config_file() {
        let temp_dir = TempDir::new().unwrap();
        let service = service(&temp_dir);
        fs::write(
            service.config_path(),
            "[generation]\nidea_workers = 5\n\n[storage]\ndata_file = \"/tmp/p.json\"\n",
        )
        .unwrap();

        let config = service.load_config().unwrap();
        assert_eq!(config.generation.idea_workers, 5);
        assert_eq!(service.data_file(&config).unwrap(), PathBuf::from("/tmp/p.json"));
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let service = service(&temp_dir);
        fs::write(service.config_path(), "[generation]\nmax_retries = 0\n").unwrap();

        assert!(service.load_config().unwrap_err().is_config());
    }

    #[test]
    fn test_api_key_from_secret_file() {
        let temp_dir = TempDir::new().unwrap();
        let service = service(&temp_dir);
        fs::write(temp_dir.path().join("secret.json"), r#"{"api_key": "sk-file"}"#).unwrap();

        assert_eq!(service.load_api_key_from_file().unwrap(), "sk-file");
    }

    #[test]
    fn test_missing_secret_is_config_error() {
        let temp_dir = TempDir::new().unwrap();
        assert!(service(&temp_dir).load_api_key_from_file().unwrap_err().is_config());
    }

    #[test]
    fn test_ensure_config_file_round_trips() {
        let temp_dir = TempDir::new().unwrap();
        let service = service(&temp_dir);

        assert!(service.ensure_config_file().unwrap());
        assert!(!service.ensure_config_file().unwrap());
        assert_eq!(service.load_config().unwrap(), AppConfig::default());
    }
}
