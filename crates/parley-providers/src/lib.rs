//! # parley-providers
//!
//! HTTP clients for the external services Parley relays through:
//! the OpenAI chat-completion API and the Google Translate web endpoint.

pub mod google_translate;
pub mod openai;

pub use google_translate::GoogleTranslator;
pub use openai::OpenAiProvider;
