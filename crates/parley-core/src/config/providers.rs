use serde::{Deserialize, Serialize};

use super::defaults::*;

/// Provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ProviderConfig {
    #[serde(default)]
    pub openai: OpenAiConfig,
}

/// OpenAI-compatible chat-completion config.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAiConfig {
    /// Overridden by `OPENAI_API_KEY` when set.
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_openai_model")]
    pub model: String,
    #[serde(default = "default_openai_base_url")]
    pub base_url: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Prepended as a `system` message when non-empty.
    #[serde(default)]
    pub system_prompt: String,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: default_openai_model(),
            base_url: default_openai_base_url(),
            temperature: default_temperature(),
            system_prompt: String::new(),
        }
    }
}

/// Translation service config.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationConfig {
    #[serde(default = "default_translate_base_url")]
    pub base_url: String,
    /// Language the model operates in.
    #[serde(default = "default_pivot_language")]
    pub pivot_language: String,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            base_url: default_translate_base_url(),
            pivot_language: default_pivot_language(),
        }
    }
}
