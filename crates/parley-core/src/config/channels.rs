use serde::{Deserialize, Serialize};

use super::defaults::*;

/// Channel configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ChannelConfig {
    #[serde(default)]
    pub telegram: TelegramConfig,
}

/// Telegram bot config.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Overridden by `TELEGRAM_BOT_TOKEN` when set.
    #[serde(default)]
    pub bot_token: String,
    /// Reply to `/start`.
    #[serde(default = "default_welcome_message")]
    pub welcome_message: String,
    /// Reply to `/help`.
    #[serde(default = "default_help_message")]
    pub help_message: String,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            bot_token: String::new(),
            welcome_message: default_welcome_message(),
            help_message: default_help_message(),
        }
    }
}
