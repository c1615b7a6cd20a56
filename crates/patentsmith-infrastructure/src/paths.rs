//! Unified path management for patentsmith files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/patentsmith/        # Config directory
//! ├── config.toml               # Application configuration
//! └── secret.json               # API key
//!
//! ~/.local/share/patentsmith/   # Data directory
//! ├── patents.json              # Document store snapshot
//! └── patents.json.backup       # Previous snapshot
//! ```

use std::path::PathBuf;

const APP_DIR: &str = "patentsmith";

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Home directory could not be determined.
    HomeDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::HomeDirNotFound => write!(f, "Cannot find home directory"),
        }
    }
}

impl std::error::Error for PathError {}

impl From<PathError> for patentsmith_core::PatentError {
    fn from(err: PathError) -> Self {
        patentsmith_core::PatentError::config(err.to_string())
    }
}

/// Platform-appropriate locations (XDG on Linux, equivalents elsewhere).
pub struct PatentsmithPaths;

impl PatentsmithPaths {
    pub fn config_dir() -> Result<PathBuf, PathError> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or(PathError::HomeDirNotFound)
    }

    pub fn data_dir() -> Result<PathBuf, PathError> {
        dirs::data_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or(PathError::HomeDirNotFound)
    }

    pub fn config_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// The file should be readable by the owner only (600).
    pub fn secret_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("secret.json"))
    }

    pub fn default_data_file() -> Result<PathBuf, PathError> {
        Ok(Self::data_dir()?.join("patents.json"))
    }
}
