use crate::{
    context::Context,
    error::ParleyError,
    message::{IncomingMessage, OutgoingMessage},
};
use async_trait::async_trait;

/// Language-model provider trait.
///
/// The chat-completion backend implements this to turn a conversation
/// context into the assistant's next reply.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Human-readable provider name.
    fn name(&self) -> &str;

    /// Whether this provider requires an API key to function.
    fn requires_api_key(&self) -> bool;

    /// Send a conversation context to the provider and get a response.
    async fn complete(&self, context: &Context) -> Result<OutgoingMessage, ParleyError>;

    /// Check if the provider is available and ready.
    async fn is_available(&self) -> bool;
}

/// Translation service trait.
#[async_trait]
pub trait Translator: Send + Sync {
    /// Human-readable service name.
    fn name(&self) -> &str;

    /// Translate `text` into `target_language` (ISO-639-1 code), letting the
    /// service detect the source language.
    async fn translate(&self, text: &str, target_language: &str) -> Result<String, ParleyError>;
}

/// Messaging Channel trait.
///
/// A messaging platform implements this to receive and send messages.
#[async_trait]
pub trait Channel: Send + Sync {
    /// Human-readable channel name.
    fn name(&self) -> &str;

    /// Start listening for incoming messages.
    /// Returns a receiver that yields incoming messages.
    async fn start(&self) -> Result<tokio::sync::mpsc::Receiver<IncomingMessage>, ParleyError>;

    /// Send a response back through this channel.
    async fn send(&self, message: OutgoingMessage) -> Result<(), ParleyError>;

    /// Send a typing indicator to show the bot is processing.
    async fn send_typing(&self, _target: &str) -> Result<(), ParleyError> {
        Ok(())
    }

    /// Graceful shutdown.
    async fn stop(&self) -> Result<(), ParleyError>;
}
