//! JSON snapshot files with a rolling one-generation backup.
//!
//! Every save is a full rewrite:
//! 1. copy the current file (if any) to `<file>.backup`, replacing the old backup;
//! 2. serialize and write the new snapshot to the primary path;
//! 3. if step 2 fails, copy the backup back over the primary path.

use serde::{Serialize, de::DeserializeOwned};
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::Write as IoWrite;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use tracing::{error, warn};

/// Errors that can occur during snapshot file operations.
#[derive(Debug)]
pub enum BackupJsonError {
    /// File I/O error before the primary file was touched.
    IoError(std::io::Error),
    /// JSON parse error on load.
    JsonError(serde_json::Error),
    /// Writing the primary file failed.
    WriteFailed {
        message: String,
        /// Whether the primary file was put back from the backup.
        restored: bool,
    },
}

impl std::fmt::Display for BackupJsonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackupJsonError::IoError(e) => write!(f, "I/O error: {}", e),
            BackupJsonError::JsonError(e) => write!(f, "JSON error: {}", e),
            BackupJsonError::WriteFailed { message, restored } => {
                write!(f, "Snapshot write failed: {} (restored: {})", message, restored)
            }
        }
    }
}

impl std::error::Error for BackupJsonError {}

impl From<std::io::Error> for BackupJsonError {
    fn from(e: std::io::Error) -> Self {
        BackupJsonError::IoError(e)
    }
}

impl From<serde_json::Error> for BackupJsonError {
    fn from(e: serde_json::Error) -> Self {
        BackupJsonError::JsonError(e)
    }
}

impl From<BackupJsonError> for patentsmith_core::PatentError {
    fn from(err: BackupJsonError) -> Self {
        use patentsmith_core::PatentError;

        match err {
            BackupJsonError::IoError(e) => PatentError::persistence(e.to_string(), false),
            BackupJsonError::JsonError(e) => e.into(),
            BackupJsonError::WriteFailed { message, restored } => {
                PatentError::persistence(message, restored)
            }
        }
    }
}

/// `<file>.backup` next to `path`.
pub fn backup_path_for(path: &Path) -> PathBuf {
    let mut name: OsString = path.file_name().map(OsString::from).unwrap_or_default();
    name.push(".backup");
    path.with_file_name(name)
}

/// A handle to a JSON snapshot file and its backup sibling.
pub struct BackupJsonFile<T> {
    path: PathBuf,
    backup_path: PathBuf,
    _phantom: PhantomData<T>,
}

impl<T> BackupJsonFile<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new(path: PathBuf) -> Self {
        let backup_path = backup_path_for(&path);
        Self {
            path,
            backup_path,
            _phantom: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn backup_path(&self) -> &Path {
        &self.backup_path
    }

    /// Loads and deserializes the primary file.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(T))`: Successfully loaded and deserialized
    /// - `Ok(None)`: File doesn't exist or is empty
    /// - `Err`: Failed to read or parse the file
    pub fn load(&self) -> Result<Option<T>, BackupJsonError> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path)?;

        if content.trim().is_empty() {
            return Ok(None);
        }

        let data: T = serde_json::from_str(&content)?;
        Ok(Some(data))
    }

    /// Writes `data` as the new snapshot, keeping the previous one as backup.
    pub fn save(&self, data: &T) -> Result<(), BackupJsonError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let had_previous = self.path.exists();
        if had_previous {
            fs::copy(&self.path, &self.backup_path)?;
        }

        if let Err(err) = self.write_primary(data) {
            let restored = if had_previous {
                self.restore_from_backup()
            } else {
                // Nothing to restore; do not leave a partial file behind.
                let _ = fs::remove_file(&self.path);
                false
            };
            error!(
                path = %self.path.display(),
                error = %err,
                restored,
                "snapshot write failed"
            );
            return Err(BackupJsonError::WriteFailed {
                message: err.to_string(),
                restored,
            });
        }

        Ok(())
    }

    fn write_primary(&self, data: &T) -> Result<(), BackupJsonError> {
        let json = serde_json::to_string_pretty(data)?;
        let mut file = File::create(&self.path)?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;
        Ok(())
    }

    fn restore_from_backup(&self) -> bool {
        match fs::copy(&self.backup_path, &self.path) {
            Ok(_) => true,
            Err(e) => {
                warn!(
                    backup = %self.backup_path.display(),
                    error = %e,
                    "could not restore snapshot from backup"
                );
                false
            }
        }
    }
}
