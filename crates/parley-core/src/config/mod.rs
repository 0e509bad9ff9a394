mod channels;
mod defaults;
mod providers;

#[cfg(test)]
mod tests;

pub use channels::*;
pub use providers::*;

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

use crate::error::ParleyError;
use defaults::*;

/// Environment variable holding the Telegram bot token.
pub const TELEGRAM_TOKEN_ENV: &str = "TELEGRAM_BOT_TOKEN";
/// Environment variable holding the OpenAI API key.
pub const OPENAI_KEY_ENV: &str = "OPENAI_API_KEY";

/// Top-level Parley configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub translation: TranslationConfig,
    #[serde(default)]
    pub channel: ChannelConfig,
    #[serde(default)]
    pub memory: MemoryConfig,
}

/// Session memory config.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryConfig {
    /// Turns kept per user after each append.
    #[serde(default = "default_max_turns")]
    pub max_turns: usize,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            max_turns: default_max_turns(),
        }
    }
}

impl Config {
    /// Overlay credentials from the environment onto file values.
    ///
    /// `lookup` resolves a variable name; empty values are ignored.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(token) = lookup(TELEGRAM_TOKEN_ENV).filter(|v| !v.is_empty()) {
            self.channel.telegram.bot_token = token;
        }
        if let Some(key) = lookup(OPENAI_KEY_ENV).filter(|v| !v.is_empty()) {
            self.provider.openai.api_key = key;
        }
    }

    /// Reject values the bot cannot run with.
    pub fn validate(&self) -> Result<(), ParleyError> {
        if self.memory.max_turns == 0 {
            return Err(ParleyError::Config(
                "memory.max_turns must be at least 1".into(),
            ));
        }
        if !(0.0..=2.0).contains(&self.provider.openai.temperature) {
            return Err(ParleyError::Config(format!(
                "provider.openai.temperature must be within 0.0..=2.0, got {}",
                self.provider.openai.temperature
            )));
        }
        if self.translation.pivot_language.trim().is_empty() {
            return Err(ParleyError::Config(
                "translation.pivot_language must not be empty".into(),
            ));
        }
        Ok(())
    }
}

/// Parse configuration from TOML text without touching the environment.
pub fn from_toml_str(content: &str) -> Result<Config, ParleyError> {
    toml::from_str(content).map_err(|e| ParleyError::Config(format!("failed to parse config: {e}")))
}

/// Load configuration from a TOML file, then apply environment overrides.
///
/// Falls back to defaults if the file does not exist.
pub fn load(path: &str) -> Result<Config, ParleyError> {
    let path = Path::new(path);
    let mut config = if path.exists() {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ParleyError::Config(format!("failed to read {}: {e}", path.display()))
        })?;
        from_toml_str(&content)?
    } else {
        info!(
            "Config file not found at {}, using defaults",
            path.display()
        );
        Config::default()
    };

    config.apply_env_overrides(|key| std::env::var(key).ok());
    config.validate()?;
    Ok(config)
}
