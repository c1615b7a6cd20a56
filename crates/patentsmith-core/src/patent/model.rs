//! Patent domain model.
//!
//! Ideas are ephemeral batch output; documents are the records owned by a
//! [`PatentRepository`](super::PatentRepository) and persisted in a
//! [`StoreSnapshot`].

use crate::time::{epoch_seconds, now_timestamp};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use strum::{AsRefStr, Display, EnumIter, EnumString};

const TEXT_EXPORT_RULE: usize = 50;
const TEXT_EXPORT_SEPARATOR: usize = 80;

/// Lifecycle state of a generated document.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum DocumentStatus {
    /// Generated successfully and not yet revised.
    Draft,
    /// Generation failed; `content` carries the failure message.
    Error,
    /// Saved from an optimization pass.
    Optimized,
}

/// A candidate patent concept produced by one idea-generation unit of work.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatentIdea {
    /// Positional id within its batch: `idea_<n>`, 1-based.
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub field: String,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub innovation_points: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application_scenarios: Option<Vec<String>>,
    pub generated_at: String,
    /// Set when the unit of work failed. Such ideas are never "valid".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PatentIdea {
    /// Positional id for the idea at `index` (0-based) in a batch.
    pub fn positional_id(index: usize) -> String {
        format!("idea_{}", index + 1)
    }

    /// Placeholder idea for a failed unit of work at `index`.
    pub fn failed(index: usize, message: impl Into<String>) -> Self {
        Self {
            id: Self::positional_id(index),
            title: format!("Generation failed #{}", index + 1),
            field: String::new(),
            features: vec!["An error occurred during generation".to_string()],
            innovation_points: None,
            application_scenarios: None,
            generated_at: now_timestamp(),
            error: Some(message.into()),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.error.is_none()
    }
}

/// Ideas without an `error`, in their original order.
pub fn valid_ideas(ideas: &[PatentIdea]) -> Vec<PatentIdea> {
    ideas.iter().filter(|idea| idea.is_valid()).cloned().collect()
}

/// Number of ideas in a batch that were generated successfully.
pub fn count_successful_ideas(ideas: &[PatentIdea]) -> usize {
    ideas.iter().filter(|idea| idea.is_valid()).count()
}

/// A generated patent application draft.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatentDocument {
    /// `patent_<epoch-seconds>_<sequence>`
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub features: Vec<String>,
    pub content: String,
    pub generated_at: String,
    pub status: DocumentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    /// Source document of an optimized copy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_id: Option<String>,
}

impl PatentDocument {
    /// Creates a document stamped with the current time.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        features: Vec<String>,
        content: impl Into<String>,
        status: DocumentStatus,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            features,
            content: content.into(),
            generated_at: now_timestamp(),
            status,
            updated_at: None,
            original_id: None,
        }
    }

    pub fn is_error(&self) -> bool {
        self.status == DocumentStatus::Error
    }

    /// Applies `patch` and stamps `updated_at`, even when the patch is empty.
    pub fn apply_patch(&mut self, patch: DocumentPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(features) = patch.features {
            self.features = features;
        }
        if let Some(content) = patch.content {
            self.content = content;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        self.updated_at = Some(now_timestamp());
    }

    /// Plain-text rendering used by text exports.
    pub fn to_text_block(&self) -> String {
        [
            format!("Title: {}", self.title),
            format!("ID: {}", self.id),
            format!("Generated at: {}", self.generated_at),
            format!("Status: {}", self.status),
            "=".repeat(TEXT_EXPORT_RULE),
            self.content.clone(),
            format!("\n{}\n", "=".repeat(TEXT_EXPORT_SEPARATOR)),
        ]
        .join("\n")
    }
}

/// Renders every document as one text export, in the given order.
pub fn render_text_export(documents: &[PatentDocument]) -> String {
    documents
        .iter()
        .map(PatentDocument::to_text_block)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Partial update for a stored document. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub features: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<DocumentStatus>,
}

impl DocumentPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.features.is_none()
            && self.content.is_none()
            && self.status.is_none()
    }
}

/// Contents of the durable store file.
///
/// `total_count` always equals `patents.len()` for snapshots built through
/// [`StoreSnapshot::new`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreSnapshot {
    #[serde(default)]
    pub patents: Vec<PatentDocument>,
    #[serde(default)]
    pub last_updated: String,
    #[serde(default)]
    pub total_count: usize,
}

impl StoreSnapshot {
    pub fn new(patents: Vec<PatentDocument>) -> Self {
        let total_count = patents.len();
        Self {
            patents,
            last_updated: now_timestamp(),
            total_count,
        }
    }
}

/// Aggregate counts over the stored documents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatentStatistics {
    pub total_patents: usize,
    pub draft_patents: usize,
    pub error_patents: usize,
    pub optimized_patents: usize,
    /// `draft / total * 100`, or `0.0` for an empty store.
    pub success_rate: f64,
}

impl PatentStatistics {
    pub fn from_documents(documents: &[PatentDocument]) -> Self {
        let count = |status: DocumentStatus| documents.iter().filter(|d| d.status == status).count();
        let total_patents = documents.len();
        let draft_patents = count(DocumentStatus::Draft);
        let success_rate = if total_patents == 0 {
            0.0
        } else {
            draft_patents as f64 / total_patents as f64 * 100.0
        };

        Self {
            total_patents,
            draft_patents,
            error_patents: count(DocumentStatus::Error),
            optimized_patents: count(DocumentStatus::Optimized),
            success_rate,
        }
    }
}

/// Listing orders offered to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString, EnumIter)]
#[strum(serialize_all = "kebab-case")]
pub enum SortOrder {
    /// Most recently generated first.
    #[default]
    Newest,
    Oldest,
    Title,
    Status,
}

impl SortOrder {
    /// Sorts `documents` in place. Ties keep their stored order.
    pub fn sort(self, documents: &mut [PatentDocument]) {
        match self {
            SortOrder::Newest => documents.sort_by(|a, b| b.generated_at.cmp(&a.generated_at)),
            SortOrder::Oldest => documents.sort_by(|a, b| a.generated_at.cmp(&b.generated_at)),
            SortOrder::Title => documents.sort_by(|a, b| a.title.cmp(&b.title)),
            SortOrder::Status => {
                documents.sort_by(|a, b| a.status.as_ref().cmp(b.status.as_ref()))
            }
        }
    }
}

/// Where the durable file lives and how large it currently is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DataFileInfo {
    pub path: PathBuf,
    pub exists: bool,
    pub size_bytes: u64,
}

/// Issues `patent_<epoch-seconds>_<sequence>` ids.
///
/// The sequence is shared by every worker holding the generator. Call
/// [`DocumentIdGenerator::observe`] with the ids already stored before minting
/// so a fresh generator never reissues an id written by an earlier session.
#[derive(Debug, Default)]
pub struct DocumentIdGenerator {
    sequence: AtomicU64,
}

impl DocumentIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&self) -> String {
        let sequence = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
        format!("patent_{}_{}", epoch_seconds(), sequence)
    }

    /// Advances the sequence past every `patent_<epoch>_<sequence>` id given.
    ///
    /// Ids in any other shape are ignored.
    pub fn observe<'a>(&self, ids: impl IntoIterator<Item = &'a str>) {
        let highest = ids
            .into_iter()
            .filter_map(sequence_of)
            .max()
            .unwrap_or(0);
        self.sequence.fetch_max(highest, Ordering::Relaxed);
    }
}

fn sequence_of(id: &str) -> Option<u64> {
    let rest = id.strip_prefix("patent_")?;
    let (epoch, sequence) = rest.rsplit_once('_')?;
    epoch.parse::<i64>().ok()?;
    sequence.parse().ok()
}
