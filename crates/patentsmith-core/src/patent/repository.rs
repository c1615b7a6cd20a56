//! Patent repository trait.
//!
//! Defines the interface for the document Record Store.

use super::model::{DataFileInfo, DocumentPatch, PatentDocument, PatentStatistics};
use crate::error::Result;
use async_trait::async_trait;

/// An abstract store for generated patent documents.
///
/// Implementations own their collection exclusively: every read returns an
/// independent copy and every mutation runs under a single lock together
/// with the durable write that follows it.
///
/// # Persistence failures
///
/// A mutation that was applied in memory but could not be written to disk
/// returns `Err(PatentError::Persistence { .. })`. The in-memory state keeps
/// the mutation; callers decide whether to surface the failure.
#[async_trait]
pub trait PatentRepository: Send + Sync {
    /// Appends documents in order, then writes a snapshot.
    async fn append(&self, documents: Vec<PatentDocument>) -> Result<()>;

    /// Applies `patch` to the document with `id` and stamps `updated_at`.
    ///
    /// # Returns
    ///
    /// - `Ok(true)`: Document found and updated
    /// - `Ok(false)`: No document with this id
    async fn update(&self, id: &str, patch: DocumentPatch) -> Result<bool>;

    /// Removes the document with `id`.
    ///
    /// # Returns
    ///
    /// - `Ok(true)`: Document removed
    /// - `Ok(false)`: No document with this id
    async fn delete(&self, id: &str) -> Result<bool>;

    /// Copies of all documents in stored order.
    async fn list(&self) -> Vec<PatentDocument>;

    /// Copy of the document with `id`, if any.
    async fn get_by_id(&self, id: &str) -> Option<PatentDocument>;

    /// Pretty-printed JSON array of all documents.
    async fn export_json(&self) -> Result<String>;

    /// Human-readable text rendering of all documents.
    async fn export_text(&self) -> String;

    async fn statistics(&self) -> PatentStatistics;

    /// Re-reads the durable file, replacing the in-memory collection.
    /// Returns the number of documents loaded.
    async fn reload(&self) -> Result<usize>;

    /// Location and size of the durable file.
    fn data_file_info(&self) -> DataFileInfo;
}
