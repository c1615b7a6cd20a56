//! Completion contract between domain operations and an LLM backend.

mod backend;
mod model;

pub use backend::{BackendError, CompletionBackend, ErrorClass, TRANSIENT_KEYWORDS};
pub use model::{GenerationRequest, GenerationResult};
