//! JSON-file-backed document store.
//!
//! Keeps the whole collection in memory behind one async mutex and rewrites
//! the snapshot file after every mutation while still holding that mutex.

use crate::storage::{BackupJsonError, BackupJsonFile};
use async_trait::async_trait;
use patentsmith_core::error::{PatentError, Result};
use patentsmith_core::patent::{
    DataFileInfo, DocumentPatch, PatentDocument, PatentRepository, PatentStatistics,
    StoreSnapshot, render_text_export,
};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Record store persisted as a single `{patents, last_updated, total_count}` file.
///
/// # Example
///
/// ```ignore
/// let repo = JsonPatentRepository::open(PathBuf::from("patents.json"));
/// repo.append(vec![document]).await?;
/// let stats = repo.statistics().await;
/// ```
#[derive(Clone)]
pub struct JsonPatentRepository {
    documents: Arc<Mutex<Vec<PatentDocument>>>,
    file: Arc<BackupJsonFile<StoreSnapshot>>,
}

impl JsonPatentRepository {
    /// Opens the store at `path`, loading any existing snapshot.
    ///
    /// A missing or malformed file starts an empty store.
    pub fn open(path: PathBuf) -> Self {
        let file: BackupJsonFile<StoreSnapshot> = BackupJsonFile::new(path);
        let documents = match file.load() {
            Ok(Some(snapshot)) => {
                info!(
                    path = %file.path().display(),
                    count = snapshot.patents.len(),
                    "loaded document store"
                );
                snapshot.patents
            }
            Ok(None) => {
                debug!(path = %file.path().display(), "no document store yet, starting empty");
                Vec::new()
            }
            Err(err) => {
                warn!(
                    path = %file.path().display(),
                    error = %err,
                    "document store unreadable, starting empty"
                );
                Vec::new()
            }
        };

        Self {
            documents: Arc::new(Mutex::new(documents)),
            file: Arc::new(file),
        }
    }

    pub fn path(&self) -> PathBuf {
        self.file.path().to_path_buf()
    }

    /// Runs `f` on the collection under the lock; when it reports a change,
    /// writes a snapshot before the lock is released.
    async fn mutate<R, F>(&self, f: F) -> Result<R>
    where
        R: Send + 'static,
        F: FnOnce(&mut Vec<PatentDocument>) -> (R, bool) + Send + 'static,
    {
        let mut documents = Arc::clone(&self.documents).lock_owned().await;
        let file = Arc::clone(&self.file);

        tokio::task::spawn_blocking(move || {
            let (outcome, changed) = f(&mut *documents);
            if changed {
                let snapshot = StoreSnapshot::new(documents.clone());
                file.save(&snapshot)?;
                debug!(count = snapshot.total_count, "document store written");
            }
            Ok(outcome)
        })
        .await
        .map_err(|e| PatentError::internal(format!("Failed to join store task: {}", e)))?
    }
}

#[async_trait]
impl PatentRepository for JsonPatentRepository {
    async fn append(&self, new_documents: Vec<PatentDocument>) -> Result<()> {
        if new_documents.is_empty() {
            return Ok(());
        }
        self.mutate(move |documents| {
            documents.extend(new_documents);
            ((), true)
        })
        .await
    }

    async fn update(&self, id: &str, patch: DocumentPatch) -> Result<bool> {
        let id = id.to_string();
        self.mutate(move |documents| match documents.iter_mut().find(|d| d.id == id) {
            Some(document) => {
                document.apply_patch(patch);
                (true, true)
            }
            None => (false, false),
        })
        .await
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let id = id.to_string();
        self.mutate(move |documents| match documents.iter().position(|d| d.id == id) {
            Some(index) => {
                documents.remove(index);
                (true, true)
            }
            None => (false, false),
        })
        .await
    }

    async fn list(&self) -> Vec<PatentDocument> {
        self.documents.lock().await.clone()
    }

    async fn get_by_id(&self, id: &str) -> Option<PatentDocument> {
        self.documents
            .lock()
            .await
            .iter()
            .find(|d| d.id == id)
            .cloned()
    }

    async fn export_json(&self) -> Result<String> {
        let documents = self.documents.lock().await;
        Ok(serde_json::to_string_pretty(&*documents)?)
    }

    async fn export_text(&self) -> String {
        render_text_export(&self.documents.lock().await)
    }

    async fn statistics(&self) -> PatentStatistics {
        PatentStatistics::from_documents(&self.documents.lock().await)
    }

    async fn reload(&self) -> Result<usize> {
        let mut documents = Arc::clone(&self.documents).lock_owned().await;
        let file = Arc::clone(&self.file);

        tokio::task::spawn_blocking(move || {
            let loaded = match file.load() {
                Ok(snapshot) => snapshot.map(|s| s.patents).unwrap_or_default(),
                Err(BackupJsonError::JsonError(e)) => return Err(PatentError::from(e)),
                Err(err) => return Err(PatentError::io(err.to_string())),
            };
            *documents = loaded;
            info!(count = documents.len(), "document store reloaded");
            Ok(documents.len())
        })
        .await
        .map_err(|e| PatentError::internal(format!("Failed to join store task: {}", e)))?
    }

    fn data_file_info(&self) -> DataFileInfo {
        let path = self.path();
        let metadata = fs::metadata(&path).ok();
        DataFileInfo {
            exists: metadata.is_some(),
            size_bytes: metadata.map(|m| m.len()).unwrap_or(0),
            path,
        }
    }
}
