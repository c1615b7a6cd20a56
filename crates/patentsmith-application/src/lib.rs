pub mod bootstrap;
pub mod patent_assistant;
pub mod prompt_templates;

pub use bootstrap::build_assistant;
pub use patent_assistant::PatentAssistant;
pub use prompt_templates::{DefaultPromptTemplates, OptimizationFocus, PromptTemplates};
