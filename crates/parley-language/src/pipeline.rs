//! Detect-and-translate policy around the model call.
//!
//! Failure policy: detection errors degrade to English and translation
//! errors degrade to the untranslated text. Both are logged and never
//! reach the caller.

use crate::detect::{Detector, ENGLISH};
use parley_core::traits::Translator;
use std::sync::Arc;
use tracing::{debug, warn};

/// Language pipeline shared by all conversations.
#[derive(Clone)]
pub struct LanguagePipeline {
    detector: Arc<dyn Detector>,
    translator: Arc<dyn Translator>,
    pivot: String,
}

impl LanguagePipeline {
    /// Build a pipeline whose model language is English.
    pub fn new(detector: Arc<dyn Detector>, translator: Arc<dyn Translator>) -> Self {
        Self {
            detector,
            translator,
            pivot: ENGLISH.to_string(),
        }
    }

    /// Override the language the model operates in.
    pub fn with_pivot(mut self, pivot: impl Into<String>) -> Self {
        self.pivot = pivot.into();
        self
    }

    pub fn pivot(&self) -> &str {
        &self.pivot
    }

    /// Detect the language of `text`, or English when detection fails.
    pub fn detect(&self, text: &str) -> String {
        match self.detector.detect(text) {
            Ok(code) => code,
            Err(e) => {
                warn!("language detection failed, assuming {ENGLISH}: {e}");
                ENGLISH.to_string()
            }
        }
    }

    /// Translate `text` into `target`, or return it unchanged on failure.
    pub async fn translate(&self, text: &str, target: &str) -> String {
        if text.trim().is_empty() {
            return text.to_string();
        }
        match self.translator.translate(text, target).await {
            Ok(translated) => translated,
            Err(e) => {
                warn!(
                    "{} translation to {target} failed, keeping original: {e}",
                    self.translator.name()
                );
                text.to_string()
            }
        }
    }

    /// Whether text in `language` must cross into the pivot language.
    pub fn needs_translation(&self, language: &str) -> bool {
        language != self.pivot
    }

    /// Inbound leg: user's language -> pivot.
    pub async fn to_pivot(&self, text: &str, language: &str) -> String {
        if !self.needs_translation(language) {
            return text.to_string();
        }
        debug!("translating inbound {language} -> {}", self.pivot);
        self.translate(text, &self.pivot).await
    }

    /// Outbound leg: pivot -> user's language.
    pub async fn from_pivot(&self, text: &str, language: &str) -> String {
        if !self.needs_translation(language) {
            return text.to_string();
        }
        debug!("translating outbound {} -> {language}", self.pivot);
        self.translate(text, language).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use parley_core::error::ParleyError;
    use std::sync::Mutex;

    struct FixedDetector(Result<&'static str, &'static str>);

    impl Detector for FixedDetector {
        fn detect(&self, _text: &str) -> Result<String, ParleyError> {
            self.0
                .map(str::to_string)
                .map_err(|e| ParleyError::Detection(e.to_string()))
        }
    }

    /// Records every call; prefixes output with the target language.
    #[derive(Default)]
    struct RecordingTranslator {
        calls: Mutex<Vec<(String, String)>>,
        fail: bool,
    }

    #[async_trait]
    impl Translator for RecordingTranslator {
        fn name(&self) -> &str {
            "recording"
        }

        async fn translate(&self, text: &str, target: &str) -> Result<String, ParleyError> {
            self.calls
                .lock()
                .unwrap()
                .push((text.to_string(), target.to_string()));
            if self.fail {
                return Err(ParleyError::Translation("service unavailable".into()));
            }
            Ok(format!("[{target}] {text}"))
        }
    }

    fn pipeline(
        detected: Result<&'static str, &'static str>,
        fail: bool,
    ) -> (LanguagePipeline, Arc<RecordingTranslator>) {
        let translator = Arc::new(RecordingTranslator {
            fail,
            ..Default::default()
        });
        let p = LanguagePipeline::new(Arc::new(FixedDetector(detected)), translator.clone());
        (p, translator)
    }

    #[test]
    fn test_detect_failure_defaults_to_english() {
        let (p, _) = pipeline(Err("boom"), false);
        assert_eq!(p.detect("???"), "en");
    }

    #[tokio::test]
    async fn test_english_never_invokes_translator() {
        let (p, translator) = pipeline(Ok("en"), false);
        let lang = p.detect("Hello");
        assert_eq!(p.to_pivot("Hello", &lang).await, "Hello");
        assert_eq!(p.from_pivot("Hi there", &lang).await, "Hi there");
        assert!(translator.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_non_english_translates_both_legs() {
        let (p, translator) = pipeline(Ok("es"), false);
        let lang = p.detect("Hola");
        assert_eq!(p.to_pivot("Hola", &lang).await, "[en] Hola");
        assert_eq!(p.from_pivot("Hi", &lang).await, "[es] Hi");
        let calls = translator.calls.lock().unwrap();
        assert_eq!(
            *calls,
            vec![
                ("Hola".to_string(), "en".to_string()),
                ("Hi".to_string(), "es".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_translation_failure_returns_original() {
        let (p, translator) = pipeline(Ok("fr"), true);
        assert_eq!(p.translate("Bonjour", "en").await, "Bonjour");
        assert_eq!(p.to_pivot("Bonjour", "fr").await, "Bonjour");
        assert_eq!(translator.calls.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_blank_text_skips_translator() {
        let (p, translator) = pipeline(Ok("de"), false);
        assert_eq!(p.translate("   ", "en").await, "   ");
        assert!(translator.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_custom_pivot() {
        let (p, translator) = pipeline(Ok("en"), false);
        let p = p.with_pivot("de");
        assert!(p.needs_translation("en"));
        assert_eq!(p.to_pivot("Hello", "en").await, "[de] Hello");
        assert_eq!(translator.calls.lock().unwrap().len(), 1);
    }
}
