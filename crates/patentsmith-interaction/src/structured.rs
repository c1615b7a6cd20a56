//! JSON extraction from free-form completion text.

use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

static JSON_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)```json[ \t]*\r?\n?(.*?)```").expect("valid regex"));

static ANY_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```[^\n`]*\r?\n?(.*?)```").expect("valid regex"));

/// Failure of a structured completion.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StructuredCompletionError {
    /// The gateway itself returned an error result.
    #[error("completion failed: {0}")]
    Completion(String),

    /// The model answered but the answer is not valid JSON.
    #[error("could not parse JSON response: {message}")]
    Parse { message: String, raw: String },
}

impl StructuredCompletionError {
    /// Raw model output, when the failure happened after a completion.
    pub fn raw(&self) -> Option<&str> {
        match self {
            Self::Parse { raw, .. } => Some(raw),
            Self::Completion(_) => None,
        }
    }
}

/// Picks the JSON payload out of a completion.
///
/// Prefers a fenced block labelled `json`, then any fenced block, then the
/// whole text. The result is trimmed.
pub fn extract_json_block(text: &str) -> &str {
    let captured = JSON_FENCE
        .captures(text)
        .or_else(|| ANY_FENCE.captures(text))
        .and_then(|caps| caps.get(1));

    match captured {
        Some(body) => body.as_str().trim(),
        None => text.trim(),
    }
}

/// Parses a completion as JSON after delimiter stripping.
pub fn parse_structured(text: &str) -> Result<serde_json::Value, StructuredCompletionError> {
    serde_json::from_str(extract_json_block(text)).map_err(|err| StructuredCompletionError::Parse {
        message: err.to_string(),
        raw: text.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_prefers_json_fence() {
        let text = "intro\n```text\nnot this\n```\n```json\n{\"title\": \"A\"}\n```\n";
        assert_eq!(extract_json_block(text), "{\"title\": \"A\"}");
    }

    #[test]
    fn test_falls_back_to_any_fence() {
        let text = "Here you go:\n```\n{\"features\": [\"x\"]}\n```";
        assert_eq!(extract_json_block(text), "{\"features\": [\"x\"]}");
    }

    #[test]
    fn test_uppercase_json_label() {
        let text = "```JSON\n[1, 2]\n```";
        assert_eq!(extract_json_block(text), "[1, 2]");
    }

    #[test]
    fn test_raw_text_is_trimmed() {
        assert_eq!(extract_json_block("  {\"a\": 1}\n"), "{\"a\": 1}");
    }

    #[test]
    fn test_unclosed_fence_uses_raw_text() {
        let text = "```json\n{\"a\": 1}";
        assert_eq!(extract_json_block(text), text);
    }

    #[test]
    fn test_parse_structured() {
        let value = parse_structured("```json\n{\"title\":\"A\",\"features\":[\"x\"]}\n```").unwrap();
        assert_eq!(value, json!({"title": "A", "features": ["x"]}));
    }

    #[test]
    fn test_parse_failure_keeps_raw() {
        let err = parse_structured("sorry, no JSON today").unwrap_err();
        assert_eq!(err.raw(), Some("sorry, no JSON today"));
    }
}
