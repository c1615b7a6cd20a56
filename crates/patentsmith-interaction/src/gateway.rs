//! Completion gateway: one logical LLM call with bounded retry.
//!
//! Backend failures are classified by [`BackendError::class`]. Transient
//! failures are retried with a linear backoff of `attempt * 2` seconds;
//! permanent failures end the call after the first attempt. Callers always
//! get a [`GenerationResult`], never an error value.

use crate::structured::{StructuredCompletionError, parse_structured};
use async_trait::async_trait;
use patentsmith_core::completion::{
    BackendError, CompletionBackend, ErrorClass, GenerationRequest, GenerationResult,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, warn};

/// Substituted when the model answers with empty or missing content.
pub const NO_CONTENT_TEXT: &str = "model produced no usable content";

/// Error text after every retry attempt failed transiently.
pub const RETRIES_EXHAUSTED_TEXT: &str = "reached maximum retry count";

const DEFAULT_MAX_RETRIES: u32 = 3;
const BACKOFF_STEP_SECS: u64 = 2;

/// Waits between retry attempts.
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Sleeps on the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Wraps a [`CompletionBackend`] with retry/backoff and JSON parsing.
///
/// Holds no mutable state, so one gateway can be shared across workers.
#[derive(Clone)]
pub struct CompletionGateway {
    backend: Arc<dyn CompletionBackend>,
    sleeper: Arc<dyn Sleeper>,
    max_retries: u32,
    max_tokens: Option<u32>,
}

impl CompletionGateway {
    pub fn new(backend: Arc<dyn CompletionBackend>) -> Self {
        Self {
            backend,
            sleeper: Arc::new(TokioSleeper),
            max_retries: DEFAULT_MAX_RETRIES,
            max_tokens: None,
        }
    }

    /// Total number of attempts per call. Zero is treated as one.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries.max(1);
        self
    }

    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    /// Default output limit for requests that do not set their own.
    pub fn with_max_tokens(mut self, max_tokens: Option<u32>) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Delay before the attempt following `attempt` (1-based).
    pub fn backoff_for(attempt: u32) -> Duration {
        Duration::from_secs(u64::from(attempt) * BACKOFF_STEP_SECS)
    }

    /// Runs one completion with retry on transient failures.
    pub async fn complete(&self, request: &GenerationRequest) -> GenerationResult {
        let request = if request.max_tokens.is_none() && self.max_tokens.is_some() {
            request.clone().with_max_tokens(self.max_tokens)
        } else {
            request.clone()
        };

        let mut last_error: Option<BackendError> = None;
        for attempt in 1..=self.max_retries {
            debug!(attempt, backend = self.backend.name(), "sending completion request");
            match self.backend.complete(&request).await {
                Ok(text) if text.trim().is_empty() => {
                    warn!(attempt, "completion returned no content");
                    return GenerationResult::Text(NO_CONTENT_TEXT.to_string());
                }
                Ok(text) => return GenerationResult::Text(text),
                Err(err) => match err.class() {
                    ErrorClass::Permanent => {
                        error!(attempt, error = %err, "permanent completion failure");
                        return GenerationResult::Error(format!("API call failed: {err}"));
                    }
                    ErrorClass::Transient => {
                        if attempt < self.max_retries {
                            let delay = Self::backoff_for(attempt);
                            warn!(
                                attempt,
                                delay_secs = delay.as_secs(),
                                error = %err,
                                "transient completion failure, retrying"
                            );
                            self.sleeper.sleep(delay).await;
                        }
                        last_error = Some(err);
                    }
                },
            }
        }

        error!(
            attempts = self.max_retries,
            last_error = last_error.as_ref().map(|e| e.message.as_str()).unwrap_or(""),
            "completion retries exhausted"
        );
        GenerationResult::Error(RETRIES_EXHAUSTED_TEXT.to_string())
    }

    /// Runs [`complete`](Self::complete) and parses the answer as JSON.
    ///
    /// An error result from the gateway is propagated as
    /// [`StructuredCompletionError::Completion`]; the text of a successful
    /// completion is never inspected for error prefixes.
    pub async fn complete_structured(
        &self,
        request: &GenerationRequest,
    ) -> Result<serde_json::Value, StructuredCompletionError> {
        match self.complete(request).await {
            GenerationResult::Text(text) => parse_structured(&text),
            GenerationResult::Error(message) => Err(StructuredCompletionError::Completion(message)),
        }
    }
}
