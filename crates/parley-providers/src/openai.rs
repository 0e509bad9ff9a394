//! OpenAI-compatible chat-completion provider.
//!
//! Works with OpenAI's API and any compatible endpoint.

use async_trait::async_trait;
use parley_core::{
    config::OpenAiConfig,
    context::{ApiMessage, Context},
    error::ParleyError,
    message::{MessageMetadata, OutgoingMessage},
    traits::Provider,
};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, warn};

/// OpenAI-compatible provider.
pub struct OpenAiProvider {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl OpenAiProvider {
    /// Create from config values.
    pub fn from_config(base_url: String, api_key: String, model: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
            api_key,
            model,
        }
    }

    pub fn new(config: &OpenAiConfig) -> Self {
        Self::from_config(
            config.base_url.clone(),
            config.api_key.clone(),
            config.model.clone(),
        )
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

/// Build OpenAI-format messages from context (system as a message role).
pub(crate) fn build_openai_messages(system: &str, api_messages: &[ApiMessage]) -> Vec<ChatMessage> {
    let mut messages = Vec::with_capacity(api_messages.len() + 1);
    if !system.is_empty() {
        messages.push(ChatMessage {
            role: "system".to_string(),
            content: system.to_string(),
        });
    }
    for m in api_messages {
        messages.push(ChatMessage {
            role: m.role.clone(),
            content: m.content.clone(),
        });
    }
    messages
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub(crate) struct ChatMessage {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

#[derive(Deserialize)]
pub(crate) struct ChatCompletionResponse {
    pub choices: Option<Vec<ChatChoice>>,
    pub model: Option<String>,
    pub usage: Option<ChatUsage>,
}

#[derive(Deserialize)]
pub(crate) struct ChatChoice {
    pub message: Option<ChatMessage>,
}

#[derive(Deserialize)]
pub(crate) struct ChatUsage {
    pub total_tokens: Option<u64>,
}

impl ChatCompletionResponse {
    /// `choices[0].message.content`, if present.
    fn first_content(&self) -> Option<&str> {
        self.choices
            .as_ref()
            .and_then(|c| c.first())
            .and_then(|c| c.message.as_ref())
            .map(|m| m.content.as_str())
    }
}

/// Build the request body for a context.
pub(crate) fn build_request(default_model: &str, context: &Context) -> ChatCompletionRequest {
    let (system, api_messages) = context.to_api_messages();
    ChatCompletionRequest {
        model: context.model.as_deref().unwrap_or(default_model).to_string(),
        messages: build_openai_messages(&system, &api_messages),
        temperature: context.temperature,
    }
}

/// Turn a raw response body into reply text plus metadata.
pub(crate) fn parse_response(body: &str) -> Result<(String, MessageMetadata), ParleyError> {
    let parsed: ChatCompletionResponse = serde_json::from_str(body)
        .map_err(|e| ParleyError::Provider(format!("openai: failed to parse response: {e}")))?;

    let text = parsed
        .first_content()
        .ok_or_else(|| ParleyError::Provider("openai: response contained no choices".into()))?
        .to_string();
    if text.trim().is_empty() {
        return Err(ParleyError::Provider("openai: response content was empty".into()));
    }

    Ok((
        text,
        MessageMetadata {
            provider_used: "openai".to_string(),
            tokens_used: parsed.usage.as_ref().and_then(|u| u.total_tokens),
            processing_time_ms: 0,
            model: parsed.model,
        },
    ))
}

#[async_trait]
impl Provider for OpenAiProvider {
    fn name(&self) -> &str {
        "openai"
    }

    fn requires_api_key(&self) -> bool {
        true
    }

    async fn complete(&self, context: &Context) -> Result<OutgoingMessage, ParleyError> {
        let start = Instant::now();
        let body = build_request(&self.model, context);

        let url = format!("{}/chat/completions", self.base_url.trim_end_matches('/'));
        debug!(
            "openai: POST {url} model={} messages={}",
            body.model,
            body.messages.len()
        );

        let resp = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&body)
            .send()
            .await
            .map_err(|e| ParleyError::Provider(format!("openai request failed: {e}")))?;

        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| ParleyError::Provider(format!("openai: failed to read response: {e}")))?;

        if !status.is_success() {
            return Err(ParleyError::Provider(format!(
                "openai returned {status}: {text}"
            )));
        }

        let (reply, mut metadata) = parse_response(&text)?;
        metadata.processing_time_ms = start.elapsed().as_millis() as u64;

        Ok(OutgoingMessage {
            text: reply,
            metadata,
            reply_target: None,
        })
    }

    async fn is_available(&self) -> bool {
        if self.api_key.is_empty() {
            warn!("openai: no API key configured");
            return false;
        }
        // Basic check: try to list models.
        let url = format!("{}/models", self.base_url.trim_end_matches('/'));
        match self
            .client
            .get(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .send()
            .await
        {
            Ok(resp) => resp.status().is_success(),
            Err(e) => {
                warn!("openai not available: {e}");
                false
            }
        }
    }
}
