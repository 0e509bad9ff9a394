//! Offline language detection.
//!
//! Non-Latin scripts are classified by their Unicode block; Latin text is
//! scored against short stop-word lists.

use parley_core::error::ParleyError;
use tracing::warn;

/// ISO-639-1 code for English.
pub const ENGLISH: &str = "en";

/// Something that can guess the language of a text.
pub trait Detector: Send + Sync {
    /// Return an ISO-639-1 code, or an error when the text carries no signal.
    fn detect(&self, text: &str) -> Result<String, ParleyError>;
}

/// Script + stop-word detector. Needs no network and no model files.
#[derive(Debug, Default, Clone, Copy)]
pub struct HeuristicDetector;

/// Latin-script languages and their most frequent short words.
const STOP_WORDS: &[(&str, &[&str])] = &[
    (
        "en",
        &[
            "the", "and", "is", "are", "you", "what", "my", "me", "for", "with", "this", "that",
            "hello", "please", "thanks", "how", "will", "about", "today", "i", "it", "of",
        ],
    ),
    (
        "es",
        &[
            "que", "por", "para", "como", "cómo", "con", "una", "los", "las", "del", "pero", "hola",
            "gracias", "necesito", "quiero", "puedes", "estás", "está", "mi", "hoy", "qué", "el",
            "y", "es", "soy", "muy",
        ],
    ),
    (
        "pt",
        &[
            "com", "uma", "dos", "das", "não", "mais", "tem", "isso", "olá", "obrigado", "obrigada",
            "preciso", "você", "meu", "minha", "hoje", "é", "sou", "muito",
        ],
    ),
    (
        "fr",
        &[
            "les", "des", "une", "est", "pas", "pour", "dans", "avec", "sur", "bonjour", "merci",
            "je", "nous", "vous", "mon", "ma", "aujourd", "suis", "très", "le", "la",
        ],
    ),
    (
        "de",
        &[
            "und", "der", "die", "das", "ist", "nicht", "ein", "eine", "ich", "auf", "mit", "für",
            "den", "hallo", "danke", "bitte", "heute", "mein", "wie", "bin",
        ],
    ),
    (
        "it",
        &[
            "che", "gli", "non", "sono", "della", "nel", "questo", "ciao", "grazie", "io", "anche",
            "oggi", "il", "mio", "come", "sei",
        ],
    ),
    (
        "nl",
        &[
            "het", "een", "van", "en", "niet", "dat", "met", "voor", "zijn", "ook", "maar", "ik",
            "dank", "vandaag", "mijn", "hoe",
        ],
    ),
];

impl HeuristicDetector {
    /// Classify by dominant non-Latin script, if any.
    fn detect_script(text: &str) -> Option<&'static str> {
        let mut letters = 0usize;
        let mut counts: [(&str, usize); 9] = [
            ("ru", 0),
            ("el", 0),
            ("ar", 0),
            ("he", 0),
            ("hi", 0),
            ("th", 0),
            ("ko", 0),
            ("ja", 0),
            ("zh", 0),
        ];

        for c in text.chars().filter(|c| c.is_alphabetic()) {
            letters += 1;
            let slot = match c as u32 {
                0x0400..=0x04FF => Some(0),
                0x0370..=0x03FF => Some(1),
                0x0600..=0x06FF | 0x0750..=0x077F => Some(2),
                0x0590..=0x05FF => Some(3),
                0x0900..=0x097F => Some(4),
                0x0E00..=0x0E7F => Some(5),
                0xAC00..=0xD7AF | 0x1100..=0x11FF => Some(6),
                0x3040..=0x30FF => Some(7),
                0x4E00..=0x9FFF => Some(8),
                _ => None,
            };
            if let Some(i) = slot {
                counts[i].1 += 1;
            }
        }

        // Any kana marks Japanese even when Han characters dominate.
        if counts[7].1 > 0 {
            return Some("ja");
        }

        let (code, best) = counts.iter().max_by_key(|(_, n)| *n).copied()?;
        (best * 2 > letters).then_some(code)
    }

    fn detect_latin(text: &str) -> &'static str {
        let lower = text.to_lowercase();
        let words: Vec<&str> = lower
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .collect();

        let mut best = ENGLISH;
        let mut best_score = 0usize;
        for (lang, stop_words) in STOP_WORDS {
            let score = words.iter().filter(|w| stop_words.contains(*w)).count();
            if score > best_score {
                best_score = score;
                best = *lang;
            }
        }

        // Short messages (≤3 words): 1 match suffices (e.g. "hola").
        // Longer messages: require 2+ to avoid false positives.
        let threshold = if words.len() <= 3 { 1 } else { 2 };
        if best_score >= threshold {
            best
        } else {
            ENGLISH
        }
    }
}

impl Detector for HeuristicDetector {
    fn detect(&self, text: &str) -> Result<String, ParleyError> {
        if !text.chars().any(char::is_alphabetic) {
            return Err(ParleyError::Detection(
                "text contains no letters to classify".into(),
            ));
        }
        let code = Self::detect_script(text).unwrap_or_else(|| Self::detect_latin(text));
        Ok(code.to_string())
    }
}

/// Detect with [`HeuristicDetector`], falling back to English on failure.
pub fn detect_language(text: &str) -> String {
    match HeuristicDetector.detect(text) {
        Ok(code) => code,
        Err(e) => {
            warn!("language detection failed, assuming {ENGLISH}: {e}");
            ENGLISH.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detect(text: &str) -> String {
        HeuristicDetector.detect(text).unwrap()
    }

    #[test]
    fn test_detect_english() {
        assert_eq!(detect("Hello"), "en");
        assert_eq!(detect("What is my horoscope for today?"), "en");
    }

    #[test]
    fn test_detect_spanish() {
        assert_eq!(detect("Hola"), "es");
        assert_eq!(
            detect("Hola, ¿cómo estás? Quiero saber mi horóscopo para hoy"),
            "es"
        );
    }

    #[test]
    fn test_detect_other_latin_languages() {
        assert_eq!(detect("Bonjour, je voudrais mon horoscope pour demain"), "fr");
        assert_eq!(detect("Ich möchte wissen, wie mein Tag wird, danke"), "de");
        assert_eq!(detect("Olá, você pode me ajudar? Preciso de ajuda hoje"), "pt");
        assert_eq!(detect("Ciao, che cosa mi aspetta oggi? Grazie"), "it");
    }

    #[test]
    fn test_detect_by_script() {
        assert_eq!(detect("Привет, как дела?"), "ru");
        assert_eq!(detect("Καλημέρα"), "el");
        assert_eq!(detect("مرحبا كيف حالك"), "ar");
        assert_eq!(detect("안녕하세요"), "ko");
        assert_eq!(detect("こんにちは、元気ですか"), "ja");
        assert_eq!(detect("你好吗"), "zh");
    }

    #[test]
    fn test_low_signal_latin_is_english() {
        assert_eq!(detect("Aries Taurus Gemini"), "en");
    }

    #[test]
    fn test_no_letters_is_error() {
        assert!(matches!(
            HeuristicDetector.detect("12345 !!!"),
            Err(ParleyError::Detection(_))
        ));
        assert!(HeuristicDetector.detect("").is_err());
    }

    #[test]
    fn test_detect_language_falls_back_to_english() {
        assert_eq!(detect_language("🙂🙂"), "en");
        assert_eq!(detect_language("Hola"), "es");
    }
}
