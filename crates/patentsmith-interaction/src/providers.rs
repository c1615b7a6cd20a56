//! Predefined OpenAI-compatible providers.

use serde::Serialize;

pub const CUSTOM_PROVIDER: &str = "Custom";

/// A known vendor endpoint and its suggested models.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderPreset {
    pub name: &'static str,
    pub base_url: &'static str,
    pub models: &'static [&'static str],
}

const PRESETS: &[ProviderPreset] = &[
    ProviderPreset {
        name: "Google Gemini",
        base_url: "https://generativelanguage.googleapis.com/v1beta/openai/",
        models: &[
            "gemini-2.0-flash-exp",
            "gemini-2.5-flash-preview-05-20",
            "gemini-2.5-pro-preview-05-06",
        ],
    },
    ProviderPreset {
        name: "OpenAI",
        base_url: "https://api.openai.com/v1/",
        models: &["gpt-4o", "gpt-4o-mini", "gpt-4-turbo", "gpt-3.5-turbo"],
    },
    ProviderPreset {
        name: "Anthropic Claude",
        base_url: "https://api.anthropic.com/v1/",
        models: &[
            "claude-3-5-sonnet-20241022",
            "claude-3-5-haiku-20241022",
            "claude-3-opus-20240229",
        ],
    },
    ProviderPreset {
        name: "DeepSeek",
        base_url: "https://api.deepseek.com/v1/",
        models: &["deepseek-chat", "deepseek-coder"],
    },
    ProviderPreset {
        name: "Zhipu AI",
        base_url: "https://open.bigmodel.cn/api/paas/v4/",
        models: &["glm-4-plus", "glm-4-0520", "glm-4"],
    },
    ProviderPreset {
        name: CUSTOM_PROVIDER,
        base_url: "",
        models: &[],
    },
];

pub fn predefined_providers() -> &'static [ProviderPreset] {
    PRESETS
}

/// Case-insensitive lookup by provider name.
pub fn find_preset(name: &str) -> Option<&'static ProviderPreset> {
    PRESETS
        .iter()
        .find(|preset| preset.name.eq_ignore_ascii_case(name.trim()))
}
