//! Conversation orchestrator: detect, translate in, ask the model,
//! remember, translate out.

use parley_core::{
    context::{Context, Turn},
    error::ParleyError,
    traits::Provider,
};
use parley_language::LanguagePipeline;
use parley_memory::{Session, SessionStore};
use std::sync::Arc;
use tracing::{error, info};

/// Prefix of the reply sent when a message cannot be answered.
pub const APOLOGY_PREFIX: &str = "Sorry, something went wrong";

/// Runs one user message through the language pipeline and the model.
pub struct Orchestrator {
    provider: Arc<dyn Provider>,
    language: LanguagePipeline,
    sessions: SessionStore,
    system_prompt: String,
    temperature: f32,
}

impl Orchestrator {
    pub fn new(
        provider: Arc<dyn Provider>,
        language: LanguagePipeline,
        sessions: SessionStore,
    ) -> Self {
        Self {
            provider,
            language,
            sessions,
            system_prompt: String::new(),
            temperature: 0.7,
        }
    }

    pub fn with_system_prompt(mut self, system_prompt: impl Into<String>) -> Self {
        self.system_prompt = system_prompt.into();
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Answer `text` from `user_id`, returning the reply in the user's language.
    ///
    /// The user's session stays locked for the whole exchange, so messages
    /// from one user are answered strictly in arrival order. Turns appended
    /// before a failure are kept.
    pub async fn respond(&self, user_id: &str, text: &str) -> Result<String, ParleyError> {
        self.exchange(user_id, Input::User(text)).await
    }

    /// Ask the model `prompt`, already written in the pivot language, on
    /// behalf of `user_id`. The reply comes back in the language of the
    /// user's latest message.
    pub async fn respond_to_prompt(
        &self,
        user_id: &str,
        prompt: &str,
    ) -> Result<String, ParleyError> {
        self.exchange(user_id, Input::Prompt(prompt)).await
    }

    /// Like [`respond`](Self::respond), but failures become an apology the
    /// user can read.
    pub async fn handle(&self, user_id: &str, text: &str) -> String {
        apologize(user_id, self.respond(user_id, text).await)
    }

    /// Like [`respond_to_prompt`](Self::respond_to_prompt), with the same
    /// apology on failure.
    pub async fn handle_prompt(&self, user_id: &str, prompt: &str) -> String {
        apologize(user_id, self.respond_to_prompt(user_id, prompt).await)
    }

    async fn exchange(&self, user_id: &str, input: Input<'_>) -> Result<String, ParleyError> {
        let handle = self.sessions.get_or_create(user_id).await;
        let mut session = handle.lock().await;

        let (language, inbound) = match input {
            Input::User(text) => {
                let language = self.language.detect(text);
                session.set_language(language.clone());
                let inbound = self.language.to_pivot(text, &language).await;
                (language, inbound)
            }
            Input::Prompt(prompt) => {
                let language = session.language().unwrap_or(self.language.pivot());
                (language.to_string(), prompt.to_string())
            }
        };

        session.push(Turn::user(inbound));

        let context = Context::new(session.turns().to_vec())
            .with_system_prompt(self.system_prompt_for(&session))
            .with_temperature(self.temperature);
        let reply = self.provider.complete(&context).await?;

        info!(
            "{} replied to {user_id} in {}ms (lang={language}, tokens={}, turns={})",
            reply.metadata.provider_used,
            reply.metadata.processing_time_ms,
            reply
                .metadata
                .tokens_used
                .map_or_else(|| "?".to_string(), |t| t.to_string()),
            session.turns().len() + 1,
        );

        session.push(Turn::assistant(reply.text.clone()));

        Ok(self.language.from_pivot(&reply.text, &language).await)
    }

    /// Configured system prompt, followed by the user's profile when known.
    fn system_prompt_for(&self, session: &Session) -> String {
        match session.profile() {
            Some(profile) if self.system_prompt.is_empty() => profile.prompt_line(),
            Some(profile) => format!("{}\n\n{}", self.system_prompt, profile.prompt_line()),
            None => self.system_prompt.clone(),
        }
    }
}

/// Where the text of an exchange comes from.
#[derive(Debug, Clone, Copy)]
enum Input<'a> {
    /// Typed by the user, in any language.
    User(&'a str),
    /// Composed by the bot, already in the pivot language.
    Prompt(&'a str),
}

fn apologize(user_id: &str, result: Result<String, ParleyError>) -> String {
    match result {
        Ok(reply) => reply,
        Err(e) => {
            error!("failed to answer {user_id}: {e}");
            format!("{APOLOGY_PREFIX}: {e}")
        }
    }
}
