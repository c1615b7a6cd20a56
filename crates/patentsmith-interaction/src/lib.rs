//! Adapters that reach the LLM vendor: the retrying completion gateway and
//! an HTTP backend for OpenAI-compatible chat-completions endpoints.

pub mod gateway;
pub mod openai_compatible_backend;
pub mod providers;
pub mod structured;

pub use gateway::{CompletionGateway, NO_CONTENT_TEXT, RETRIES_EXHAUSTED_TEXT, Sleeper, TokioSleeper};
pub use openai_compatible_backend::OpenAiCompatibleBackend;
pub use providers::{CUSTOM_PROVIDER, ProviderPreset, find_preset, predefined_providers};
pub use structured::{StructuredCompletionError, extract_json_block};
