//! Google Translate web endpoint (`translate_a/single`, `client=gtx`).
//!
//! Keyless. The source language is always `auto`.

use async_trait::async_trait;
use parley_core::{config::TranslationConfig, error::ParleyError, traits::Translator};
use serde_json::Value;
use tracing::debug;

/// Translator backed by the public Google Translate endpoint.
pub struct GoogleTranslator {
    client: reqwest::Client,
    base_url: String,
}

impl GoogleTranslator {
    pub fn new(config: &TranslationConfig) -> Self {
        Self::with_base_url(config.base_url.clone())
    }

    pub fn with_base_url(base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }
}

/// Join the translated segments of a `translate_a/single` response.
///
/// The body looks like `[[["Hello ","Hola ",...],["world","mundo",...]],null,"es",...]`;
/// the first element of each segment is the translated piece.
pub(crate) fn parse_translation(body: &str) -> Result<String, ParleyError> {
    let value: Value = serde_json::from_str(body)
        .map_err(|e| ParleyError::Translation(format!("google: failed to parse response: {e}")))?;

    let segments = value
        .get(0)
        .and_then(Value::as_array)
        .ok_or_else(|| ParleyError::Translation("google: response has no segments".into()))?;

    let translated: String = segments
        .iter()
        .filter_map(|seg| seg.get(0).and_then(Value::as_str))
        .collect();

    if translated.is_empty() {
        return Err(ParleyError::Translation(
            "google: response contained an empty translation".into(),
        ));
    }
    Ok(translated)
}

#[async_trait]
impl Translator for GoogleTranslator {
    fn name(&self) -> &str {
        "google"
    }

    async fn translate(&self, text: &str, target_language: &str) -> Result<String, ParleyError> {
        let url = format!("{}/translate_a/single", self.base_url.trim_end_matches('/'));
        debug!("google: translate {} chars -> {target_language}", text.chars().count());

        let resp = self
            .client
            .get(&url)
            .query(&[
                ("client", "gtx"),
                ("sl", "auto"),
                ("tl", target_language),
                ("dt", "t"),
                ("q", text),
            ])
            .send()
            .await
            .map_err(|e| ParleyError::Translation(format!("google request failed: {e}")))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| ParleyError::Translation(format!("google: failed to read response: {e}")))?;

        if !status.is_success() {
            return Err(ParleyError::Translation(format!(
                "google returned {status}: {body}"
            )));
        }

        parse_translation(&body)
    }
}
