//! Patent Assistant
//!
//! Use-case layer: fans generation work out over the bounded dispatcher,
//! turns completions into ideas and documents, and records the results in
//! the patent repository.

use crate::prompt_templates::{OptimizationFocus, PromptTemplates};
use patentsmith_core::completion::{GenerationRequest, GenerationResult};
use patentsmith_core::dispatch_all;
use patentsmith_core::error::Result;
use patentsmith_core::patent::{
    DataFileInfo, DocumentIdGenerator, DocumentPatch, DocumentStatus, PatentDocument, PatentIdea,
    PatentRepository, PatentStatistics, SortOrder, count_successful_ideas,
};
use patentsmith_core::time::now_timestamp;
use patentsmith_interaction::CompletionGateway;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

const CONNECTION_TEST_PROMPT: &str = "Reply with the single word OK.";
const CONNECTION_TEST_TEMPERATURE: f32 = 0.1;
const OPTIMIZED_TITLE_SUFFIX: &str = " (optimized)";

/// Reads a string list, accepting a lone string as a one-item list.
///
/// Non-string items are skipped. Any other shape yields `None`.
fn string_list(value: Option<&Value>) -> Option<Vec<String>> {
    match value? {
        Value::Array(items) => Some(
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect(),
        ),
        Value::String(item) => Some(vec![item.clone()]),
        _ => None,
    }
}

/// Turns a parsed completion into the idea at `index`.
///
/// Only `title` and `features` are required. Optional fields that arrive in
/// an unexpected shape are dropped rather than failing the idea.
fn idea_from_value(index: usize, value: Value) -> std::result::Result<PatentIdea, String> {
    let Value::Object(object) = value else {
        return Err("unexpected idea format: expected a JSON object".to_string());
    };

    let title = object
        .get("title")
        .and_then(Value::as_str)
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .ok_or_else(|| "response is missing required field 'title'".to_string())?;
    let features = string_list(object.get("features"))
        .filter(|f| !f.is_empty())
        .ok_or_else(|| "response is missing required field 'features'".to_string())?;

    Ok(PatentIdea {
        id: PatentIdea::positional_id(index),
        title,
        field: object
            .get("field")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        features,
        innovation_points: string_list(object.get("innovation_points")),
        application_scenarios: string_list(object.get("application_scenarios")),
        generated_at: now_timestamp(),
        error: None,
    })
}

/// Drafts single documents. Shared by direct and batch generation.
struct PatentWriter {
    gateway: Arc<CompletionGateway>,
    templates: Arc<dyn PromptTemplates>,
    ids: Arc<DocumentIdGenerator>,
}

impl PatentWriter {
    async fn write(&self, title: &str, features: &[String], temperature: f32) -> PatentDocument {
        let prompt = match self.templates.full_patent_prompt(title, features) {
            Ok(prompt) => prompt,
            Err(e) => return self.failed(title, features, format!("Error while generating patent: {e}")),
        };
        let request = GenerationRequest::new(prompt, self.templates.patent_system_prompt(), temperature);

        match self.gateway.complete(&request).await {
            GenerationResult::Text(content) => PatentDocument::new(
                self.ids.next_id(),
                title,
                features.to_vec(),
                content,
                DocumentStatus::Draft,
            ),
            GenerationResult::Error(message) => self.failed(title, features, message),
        }
    }

    fn failed(&self, title: &str, features: &[String], content: impl Into<String>) -> PatentDocument {
        PatentDocument::new(
            self.ids.next_id(),
            title,
            features.to_vec(),
            content,
            DocumentStatus::Error,
        )
    }
}

/// Entry point for every patent operation.
#[derive(Clone)]
pub struct PatentAssistant {
    gateway: Arc<CompletionGateway>,
    templates: Arc<dyn PromptTemplates>,
    repository: Arc<dyn PatentRepository>,
    writer: Arc<PatentWriter>,
}

impl PatentAssistant {
    pub fn new(
        gateway: CompletionGateway,
        templates: Arc<dyn PromptTemplates>,
        repository: Arc<dyn PatentRepository>,
    ) -> Self {
        let gateway = Arc::new(gateway);
        let writer = Arc::new(PatentWriter {
            gateway: Arc::clone(&gateway),
            templates: Arc::clone(&templates),
            ids: Arc::new(DocumentIdGenerator::new()),
        });
        Self {
            gateway,
            templates,
            repository,
            writer,
        }
    }

    pub fn repository(&self) -> &Arc<dyn PatentRepository> {
        &self.repository
    }

    // ============================================================================
    // Generation
    // ============================================================================

    /// Generates `count` ideas concurrently, one completion per idea.
    ///
    /// Ideas come back in slot order with ids `idea_1..idea_count`. A slot
    /// whose completion or parsing fails holds an idea with `error` set.
    /// Nothing is persisted.
    pub async fn generate_patent_ideas(
        &self,
        count: usize,
        temperature: f32,
        max_workers: usize,
    ) -> Vec<PatentIdea> {
        info!(count, max_workers, "generating patent ideas");

        let prompt = match self.templates.idea_prompt() {
            Ok(prompt) => prompt,
            Err(e) => {
                error!(error = %e, "failed to build idea prompt");
                return (0..count).map(|i| PatentIdea::failed(i, e.to_string())).collect();
            }
        };
        let request = GenerationRequest::new(prompt, self.templates.idea_system_prompt(), temperature);
        let items: Vec<(usize, GenerationRequest)> = (0..count).map(|i| (i, request.clone())).collect();

        let gateway = Arc::clone(&self.gateway);
        let ideas = dispatch_all(
            items,
            max_workers,
            move |(index, request): (usize, GenerationRequest)| {
                let gateway = Arc::clone(&gateway);
                async move {
                    let value = gateway.complete_structured(&request).await.map_err(|e| match e.raw() {
                        Some(raw) => {
                            debug!(index, raw, "unparseable idea response");
                            format!("{e}; raw response: {raw}")
                        }
                        None => e.to_string(),
                    })?;
                    idea_from_value(index, value)
                }
            },
            |index, message| PatentIdea::failed(index, message),
        )
        .await;

        info!(
            requested = count,
            succeeded = count_successful_ideas(&ideas),
            "patent idea generation finished"
        );
        ideas
    }

    /// Drafts one full patent and appends it to the repository.
    ///
    /// Generation failures produce a document with `status = error` whose
    /// content is the failure message; that document is stored as well.
    pub async fn generate_full_patent(
        &self,
        title: &str,
        features: &[String],
        temperature: f32,
    ) -> PatentDocument {
        info!(title, "generating full patent");
        self.sync_id_sequence().await;
        let document = self.writer.write(title, features, temperature).await;
        if document.is_error() {
            warn!(id = %document.id, "patent generation failed");
        }
        self.persist(std::slice::from_ref(&document)).await;
        document
    }

    /// Drafts one document per idea with at most `max_workers` in flight.
    ///
    /// Ideas that already carry an error become error documents without a
    /// completion call. All documents are appended in a single repository
    /// call, including error documents.
    pub async fn batch_generate_patents(
        &self,
        ideas: &[PatentIdea],
        temperature: f32,
        max_workers: usize,
    ) -> Vec<PatentDocument> {
        info!(ideas = ideas.len(), max_workers, "batch generating patents");

        let fallback: Vec<(String, Vec<String>)> = ideas
            .iter()
            .map(|idea| (idea.title.clone(), idea.features.clone()))
            .collect();

        self.sync_id_sequence().await;
        let writer = Arc::clone(&self.writer);
        let recover_writer = Arc::clone(&self.writer);
        let documents = dispatch_all(
            ideas.to_vec(),
            max_workers,
            move |idea: PatentIdea| {
                let writer = Arc::clone(&writer);
                async move {
                    let document = match &idea.error {
                        Some(err) => writer.failed(
                            &idea.title,
                            &idea.features,
                            format!("Unable to generate patent content: {err}"),
                        ),
                        None => writer.write(&idea.title, &idea.features, temperature).await,
                    };
                    Ok::<_, String>(document)
                }
            },
            |index, message| {
                let (title, features) = &fallback[index];
                recover_writer.failed(title, features, format!("Error while generating patent: {message}"))
            },
        )
        .await;

        self.persist(&documents).await;

        let failed = documents.iter().filter(|d| d.is_error()).count();
        info!(
            total = documents.len(),
            succeeded = documents.len() - failed,
            failed,
            "batch patent generation finished"
        );
        documents
    }

    /// Rewrites `content` with a focus-specific instruction. Nothing is stored.
    pub async fn optimize_patent(
        &self,
        content: &str,
        focus: OptimizationFocus,
        temperature: f32,
    ) -> GenerationResult {
        info!(%focus, "optimizing patent");
        let prompt = match self.templates.optimization_prompt(content, focus) {
            Ok(prompt) => prompt,
            Err(e) => return GenerationResult::Error(e.to_string()),
        };
        let request = GenerationRequest::new(prompt, self.templates.optimize_system_prompt(), temperature);
        self.gateway.complete(&request).await
    }

    /// Stores an optimized rewrite of `source` as a new document.
    pub async fn save_optimized_patent(
        &self,
        source: &PatentDocument,
        optimized_content: impl Into<String>,
    ) -> Result<PatentDocument> {
        self.sync_id_sequence().await;
        let mut document = PatentDocument::new(
            self.writer.ids.next_id(),
            format!("{}{}", source.title, OPTIMIZED_TITLE_SUFFIX),
            source.features.clone(),
            optimized_content,
            DocumentStatus::Optimized,
        );
        document.original_id = Some(source.id.clone());
        self.repository.append(vec![document.clone()]).await?;
        Ok(document)
    }

    /// Sends a tiny prompt to check credentials and connectivity.
    pub async fn test_connection(&self) -> GenerationResult {
        let request = GenerationRequest::new(CONNECTION_TEST_PROMPT, "", CONNECTION_TEST_TEMPERATURE)
            .with_max_tokens(Some(16));
        self.gateway.complete(&request).await
    }

    /// Moves the id sequence past every stored id so a new session continues
    /// where earlier ones stopped.
    async fn sync_id_sequence(&self) {
        let stored = self.repository.list().await;
        self.writer.ids.observe(stored.iter().map(|d| d.id.as_str()));
    }

    async fn persist(&self, documents: &[PatentDocument]) {
        if documents.is_empty() {
            return;
        }
        if let Err(e) = self.repository.append(documents.to_vec()).await {
            error!(error = %e, count = documents.len(), "failed to persist generated patents");
        }
    }

    // ============================================================================
    // Records
    // ============================================================================

    pub async fn list_patents(&self) -> Vec<PatentDocument> {
        self.repository.list().await
    }

    pub async fn list_patents_sorted(&self, order: SortOrder) -> Vec<PatentDocument> {
        let mut documents = self.repository.list().await;
        order.sort(&mut documents);
        documents
    }

    pub async fn get_patent(&self, id: &str) -> Option<PatentDocument> {
        self.repository.get_by_id(id).await
    }

    /// Returns `Ok(false)` when no document has `id`.
    pub async fn update_patent(&self, id: &str, patch: DocumentPatch) -> Result<bool> {
        self.repository.update(id, patch).await
    }

    pub async fn delete_patent(&self, id: &str) -> Result<bool> {
        self.repository.delete(id).await
    }

    pub async fn export_json(&self) -> Result<String> {
        self.repository.export_json().await
    }

    pub async fn export_text(&self) -> String {
        self.repository.export_text().await
    }

    pub async fn export_document_json(&self, id: &str) -> Result<Option<String>> {
        match self.repository.get_by_id(id).await {
            Some(document) => Ok(Some(serde_json::to_string_pretty(&document)?)),
            None => Ok(None),
        }
    }

    pub async fn export_document_text(&self, id: &str) -> Option<String> {
        self.repository.get_by_id(id).await.map(|d| d.to_text_block())
    }

    pub async fn statistics(&self) -> PatentStatistics {
        self.repository.statistics().await
    }

    pub async fn reload(&self) -> Result<usize> {
        self.repository.reload().await
    }

    pub fn data_file_info(&self) -> DataFileInfo {
        self.repository.data_file_info()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn idea_from_value_fills_positional_id() {
        let idea = idea_from_value(
            1,
            json!({
                "title": "Adaptive fan curve",
                "field": "Thermal management",
                "features": ["Per-zone sensors"],
                "innovation_points": ["Predictive control"]
            }),
        )
        .unwrap();

        assert_eq!(idea.id, "idea_2");
        assert_eq!(idea.title, "Adaptive fan curve");
        assert_eq!(idea.field, "Thermal management");
        assert_eq!(idea.features, vec!["Per-zone sensors"]);
        assert!(idea.application_scenarios.is_none());
        assert_eq!(idea.innovation_points, Some(vec!["Predictive control".to_string()]));
        assert!(idea.is_valid());
    }

    #[test]
    fn idea_from_value_requires_title_and_features() {
        let missing_title = idea_from_value(0, json!({ "features": ["x"] })).unwrap_err();
        assert!(missing_title.contains("title"));

        let blank_title = idea_from_value(0, json!({ "title": "  ", "features": ["x"] })).unwrap_err();
        assert!(blank_title.contains("title"));

        let missing_features = idea_from_value(0, json!({ "title": "T" })).unwrap_err();
        assert!(missing_features.contains("features"));

        let empty_features = idea_from_value(0, json!({ "title": "T", "features": [] })).unwrap_err();
        assert!(empty_features.contains("features"));

        let only_numbers = idea_from_value(0, json!({ "title": "T", "features": [1, 2] })).unwrap_err();
        assert!(only_numbers.contains("features"));
    }

    #[test]
    fn idea_from_value_tolerates_odd_optional_fields() {
        let idea = idea_from_value(
            0,
            json!({
                "title": "Adaptive fan curve",
                "field": 42,
                "features": "Per-zone sensors",
                "innovation_points": "Faster cooling",
                "application_scenarios": { "laptops": true }
            }),
        )
        .unwrap();

        assert!(idea.is_valid());
        assert_eq!(idea.field, "");
        assert_eq!(idea.features, vec!["Per-zone sensors"]);
        assert_eq!(idea.innovation_points, Some(vec!["Faster cooling".to_string()]));
        assert!(idea.application_scenarios.is_none());
    }

    #[test]
    fn idea_from_value_rejects_non_object() {
        let err = idea_from_value(0, json!(["not", "an", "object"])).unwrap_err();
        assert!(err.starts_with("unexpected idea format"));
    }
}
