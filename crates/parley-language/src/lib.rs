//! # parley-language
//!
//! Language detection and the translate-in / translate-out pipeline that
//! lets users write in their own language while the model works in English.

pub mod detect;
pub mod pipeline;

pub use detect::{detect_language, Detector, HeuristicDetector, ENGLISH};
pub use pipeline::LanguagePipeline;
