//! Storage layer for snapshot files with backup/restore.

mod backup_json;

pub use backup_json::{BackupJsonError, BackupJsonFile, backup_path_for};
