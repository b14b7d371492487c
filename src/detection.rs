//! Source-language resolution.
//!
//! `auto` is resolved through the engine's detection capability. Any
//! detection failure falls back to English and is never surfaced to the
//! caller.

use crate::engine::Translator;
use crate::i18n::{Language, SourceLanguage};
use tracing::{info, warn};

/// Outcome of resolving a requested source language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSource {
    /// Language code handed to the engine
    pub language: String,
    /// Set only when detection actually ran and succeeded
    pub detected: Option<String>,
}

pub async fn resolve_source(
    translator: &Translator,
    text: &str,
    requested: SourceLanguage,
) -> ResolvedSource {
    if let SourceLanguage::Code(language) = requested {
        return ResolvedSource {
            language: language.code().to_string(),
            detected: None,
        };
    }

    match translator.detect(text).await {
        Ok(detected) => {
            info!("Detected language: {}", detected);
            ResolvedSource {
                language: detected.clone(),
                detected: Some(detected),
            }
        }
        Err(e) => {
            warn!(
                "Language detection failed ({}), falling back to {}",
                e,
                Language::ENGLISH
            );
            translator.metrics().record_detection_fallback();
            ResolvedSource {
                language: Language::ENGLISH.code().to_string(),
                detected: None,
            }
        }
    }
}
