use thiserror::Error;

/// Top-level error type for Parley.
#[derive(Debug, Error)]
pub enum ParleyError {
    /// Error from the language-model provider.
    #[error("provider error: {0}")]
    Provider(String),

    /// Error from the translation service.
    #[error("translation error: {0}")]
    Translation(String),

    /// The input text could not be classified.
    #[error("language detection error: {0}")]
    Detection(String),

    /// Error from a messaging channel.
    #[error("channel error: {0}")]
    Channel(String),

    /// User-supplied profile details could not be parsed.
    #[error("invalid profile: {0}")]
    Profile(String),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),
}
