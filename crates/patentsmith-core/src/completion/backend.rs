use super::model::GenerationRequest;
use async_trait::async_trait;
use thiserror::Error;

/// Lowercase fragments that mark a backend failure as worth retrying.
pub const TRANSIENT_KEYWORDS: &[&str] = &[
    "timeout",
    "timed out",
    "connection",
    "network",
    "rate limit",
    "rate_limit",
    "ratelimit",
    "429",
    "502",
    "503",
];

/// Retry classification of a backend failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Timeout, connection, network, rate limiting or HTTP 429/502/503.
    Transient,
    /// Everything else (bad credentials, malformed request, ...).
    Permanent,
}

/// A failed call to the text-completion collaborator.
///
/// Only the human-readable message is kept; classification is derived from it
/// so every backend gets the same retry behaviour.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct BackendError {
    pub message: String,
}

impl BackendError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn class(&self) -> ErrorClass {
        let lower = self.message.to_lowercase();
        if TRANSIENT_KEYWORDS.iter().any(|keyword| lower.contains(keyword)) {
            ErrorClass::Transient
        } else {
            ErrorClass::Permanent
        }
    }
}

/// The text-completion collaborator: one request in, raw text out.
///
/// An empty string means the model answered without usable content; that is
/// not an error at this level. Implementations must be safe to call
/// concurrently.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    async fn complete(&self, request: &GenerationRequest) -> Result<String, BackendError>;

    /// Short human-readable name for logs.
    fn name(&self) -> &str {
        "completion-backend"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_classification() {
        for message in [
            "Request timeout after 30s",
            "Connection refused",
            "network unreachable",
            "Rate limit exceeded",
            "HTTP 429: Too Many Requests",
            "HTTP 502: Bad Gateway",
            "HTTP 503: Service Unavailable",
            "operation Timed Out",
        ] {
            assert_eq!(BackendError::new(message).class(), ErrorClass::Transient, "{message}");
        }
    }

    #[test]
    fn test_permanent_classification() {
        for message in ["HTTP 401: invalid api key", "HTTP 400: bad request", "unknown model"] {
            assert_eq!(BackendError::new(message).class(), ErrorClass::Permanent, "{message}");
        }
    }
}
