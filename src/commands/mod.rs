//! Bot commands: static replies, profile management, and horoscope
//! requests that go through the orchestrator.

mod horoscope;
mod profile;


pub use horoscope::Forecast;

use crate::orchestrator::Orchestrator;
use chrono::NaiveDate;
use parley_core::config::TelegramConfig;

/// Grouped context for command execution.
pub struct CommandContext<'a> {
    pub orchestrator: &'a Orchestrator,
    pub replies: &'a CommandReplies,
    pub sender_id: &'a str,
    pub text: &'a str,
    /// Calendar date (UTC) the command is handled on.
    pub today: NaiveDate,
}

/// Known bot commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Help,
    SetInfo,
    ViewInfo,
    Forecast(Forecast),
}

impl Command {
    /// Parse a command from message text. Returns `None` for plain text and
    /// for unknown `/` commands. Matching ignores ASCII case.
    pub fn parse(text: &str) -> Option<Self> {
        let first = text.split_whitespace().next()?;
        // Strip @botname suffix (e.g. "/start@parley_bot" -> "/start").
        let cmd = first.split('@').next().unwrap_or(first);
        match cmd.to_ascii_lowercase().as_str() {
            "/start" => Some(Self::Start),
            "/help" => Some(Self::Help),
            "/setinfo" => Some(Self::SetInfo),
            "/viewinfo" => Some(Self::ViewInfo),
            "/today" => Some(Self::Forecast(Forecast::Today)),
            "/tomorrow" => Some(Self::Forecast(Forecast::Tomorrow)),
            "/year" => Some(Self::Forecast(Forecast::Year)),
            _ => None,
        }
    }

    /// Whether answering the command calls the model.
    pub fn needs_model(self) -> bool {
        matches!(self, Self::Forecast(_))
    }
}

/// Whether the text is addressed to the bot as a command.
pub fn is_command(text: &str) -> bool {
    text.trim_start().starts_with('/')
}

/// Everything after the command word, trimmed.
fn args(text: &str) -> &str {
    text.trim_start()
        .split_once(char::is_whitespace)
        .map_or("", |(_, rest)| rest.trim())
}

/// Configurable replies for `/start` and `/help`.
#[derive(Debug, Clone)]
pub struct CommandReplies {
    pub welcome: String,
    pub help: String,
}

impl CommandReplies {
    pub fn from_config(config: &TelegramConfig) -> Self {
        Self {
            welcome: config.welcome_message.clone(),
            help: config.help_message.clone(),
        }
    }
}

/// Handle a command and return the response text.
pub async fn handle(cmd: Command, ctx: &CommandContext<'_>) -> String {
    let sessions = ctx.orchestrator.sessions();
    match cmd {
        Command::Start => ctx.replies.welcome.clone(),
        Command::Help => ctx.replies.help.clone(),
        Command::SetInfo => profile::handle_setinfo(sessions, ctx.sender_id, args(ctx.text)).await,
        Command::ViewInfo => profile::handle_viewinfo(sessions, ctx.sender_id).await,
        Command::Forecast(forecast) => {
            let profile = sessions.profile(ctx.sender_id).await;
            let prompt = forecast.prompt(ctx.today, profile.as_ref());
            ctx.orchestrator.handle_prompt(ctx.sender_id, &prompt).await
        }
    }
}
