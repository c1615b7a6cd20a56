//! Prompt Templates
//!
//! Renders the user prompts sent for idea generation, full drafting and
//! optimization. Templates are Jinja2 (minijinja) so wording can change
//! without touching the domain operations.

use minijinja::{Environment, context};
use patentsmith_core::error::{PatentError, Result};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// System prompt for idea generation.
pub const IDEA_SYSTEM_PROMPT: &str = "You are a senior patent expert researching innovations in server \
technology. Answer strictly with a single JSON object.";

/// System prompt for full patent drafting.
pub const PATENT_SYSTEM_PROMPT: &str = "You are a senior patent attorney with twenty years of filing \
experience. Draft complete patent applications that follow international filing conventions.";

/// System prompt for patent optimization.
pub const OPTIMIZE_SYSTEM_PROMPT: &str = "You are a patent optimization expert who improves the quality \
and professionalism of patent documents.";

const IDEA_TEMPLATE: &str = r#"Propose one original, patentable invention in the field of server technology
(hardware, cooling, power delivery, virtualization, storage, networking or data-center operations).

Return a JSON object with exactly these keys:
{
  "title": "concise invention title",
  "field": "technical field",
  "features": ["key technical feature", "..."],
  "innovation_points": ["what is new compared with existing solutions", "..."],
  "application_scenarios": ["where the invention is used", "..."]
}

List three to five features. Output ONLY the JSON object."#;

const FULL_PATENT_TEMPLATE: &str = r#"Write a complete patent application for the following invention.

Title: {{ title }}

Key technical features:
{% for feature in features -%}
{{ loop.index }}. {{ feature }}
{% endfor %}
The application must contain these sections, in order:
1. Title of the invention
2. Technical field
3. Background art
4. Summary of the invention (problem solved, technical solution, beneficial effects)
5. Brief description of the drawings
6. Detailed description of embodiments
7. Claims (at least one independent claim followed by dependent claims)
8. Abstract

Use precise, formal patent language."#;

const OPTIMIZATION_TEMPLATE: &str = r#"Improve the patent document below.

Focus: {{ focus_instruction }}

Keep every technical fact of the original, fix ambiguous wording and return the
complete revised document rather than a list of suggestions.

--- DOCUMENT START ---
{{ content }}
--- DOCUMENT END ---"#;

/// Aspect an optimization pass concentrates on.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
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
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum OptimizationFocus {
    #[default]
    Comprehensive,
    TechnicalSolution,
    InnovationPoints,
    ProtectionScope,
    ComparativeAnalysis,
}

impl OptimizationFocus {
    /// Instruction embedded into the optimization prompt.
    pub fn instruction(self) -> &'static str {
        match self {
            Self::Comprehensive => {
                "improve the document as a whole: structure, clarity, technical depth and claim quality"
            }
            Self::TechnicalSolution => {
                "make the technical solution more complete and concrete, adding implementation detail \
                 where the description is thin"
            }
            Self::InnovationPoints => {
                "sharpen the innovation points and state clearly how they differ from prior art"
            }
            Self::ProtectionScope => {
                "rework the claims to broaden and layer the protection scope without losing support \
                 in the description"
            }
            Self::ComparativeAnalysis => {
                "add a comparative analysis against existing solutions and quantify the advantages"
            }
        }
    }
}

/// Source of the prompts used by the patent assistant.
pub trait PromptTemplates: Send + Sync {
    fn idea_prompt(&self) -> Result<String>;

    fn full_patent_prompt(&self, title: &str, features: &[String]) -> Result<String>;

    fn optimization_prompt(&self, content: &str, focus: OptimizationFocus) -> Result<String>;

    fn idea_system_prompt(&self) -> &str {
        IDEA_SYSTEM_PROMPT
    }

    fn patent_system_prompt(&self) -> &str {
        PATENT_SYSTEM_PROMPT
    }

    fn optimize_system_prompt(&self) -> &str {
        OPTIMIZE_SYSTEM_PROMPT
    }
}

/// Built-in templates compiled into a minijinja environment.
pub struct DefaultPromptTemplates {
    env: Environment<'static>,
}

impl DefaultPromptTemplates {
    pub fn new() -> Result<Self> {
        let mut env = Environment::new();
        for (name, source) in [
            ("idea", IDEA_TEMPLATE),
            ("full_patent", FULL_PATENT_TEMPLATE),
            ("optimization", OPTIMIZATION_TEMPLATE),
        ] {
            env.add_template(name, source)
                .map_err(|e| PatentError::internal(format!("invalid prompt template '{name}': {e}")))?;
        }
        Ok(Self { env })
    }

    fn render(&self, name: &str, ctx: minijinja::Value) -> Result<String> {
        self.env
            .get_template(name)
            .and_then(|template| template.render(ctx))
            .map_err(|e| PatentError::internal(format!("failed to render prompt '{name}': {e}")))
    }
}

impl PromptTemplates for DefaultPromptTemplates {
    fn idea_prompt(&self) -> Result<String> {
        self.render("idea", context! {})
    }

    fn full_patent_prompt(&self, title: &str, features: &[String]) -> Result<String> {
        self.render("full_patent", context! { title => title, features => features })
    }

    fn optimization_prompt(&self, content: &str, focus: OptimizationFocus) -> Result<String> {
        self.render(
            "optimization",
            context! { content => content, focus_instruction => focus.instruction() },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn full_patent_prompt_numbers_features() {
        let templates = DefaultPromptTemplates::new().unwrap();
        let prompt = templates
            .full_patent_prompt(
                "Liquid-cooled blade chassis",
                &["Cold plate per CPU".to_string(), "Leak detection loop".to_string()],
            )
            .unwrap();

        assert!(prompt.contains("Title: Liquid-cooled blade chassis"));
        assert!(prompt.contains("1. Cold plate per CPU"));
        assert!(prompt.contains("2. Leak detection loop"));
        assert!(prompt.contains("Claims"));
    }

    #[test]
    fn optimization_prompt_embeds_content_and_focus() {
        let templates = DefaultPromptTemplates::new().unwrap();
        let prompt = templates
            .optimization_prompt("Original draft body", OptimizationFocus::ProtectionScope)
            .unwrap();

        assert!(prompt.contains("Original draft body"));
        assert!(prompt.contains(OptimizationFocus::ProtectionScope.instruction()));
    }

    #[test]
    fn idea_prompt_asks_for_json_keys() {
        let templates = DefaultPromptTemplates::new().unwrap();
        let prompt = templates.idea_prompt().unwrap();
        for key in ["\"title\"", "\"features\"", "\"innovation_points\""] {
            assert!(prompt.contains(key), "missing {key}");
        }
    }

    #[test]
    fn focus_names_round_trip_through_strings() {
        for focus in OptimizationFocus::iter() {
            assert_eq!(OptimizationFocus::from_str(focus.as_ref()).unwrap(), focus);
        }
        assert_eq!(
            OptimizationFocus::from_str("technical-solution").unwrap(),
            OptimizationFocus::TechnicalSolution
        );
        assert!(OptimizationFocus::from_str("everything").is_err());
    }
}
