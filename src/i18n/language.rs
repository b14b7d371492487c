//! Language type: validated language codes for request handling.
//!
//! `Language` can only be constructed from a code present in the catalog,
//! so request validation happens once, at the API boundary.

use crate::error::GatewayError;
use crate::i18n::{LanguageCatalog, LanguageConfig};
use std::fmt;

/// Source value that asks the engine to detect the language.
pub const AUTO: &str = "auto";

/// A language code that is present in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Language {
    code: &'static str,
}

impl Language {
    /// Fallback language when detection fails, and the default target.
    pub const ENGLISH: Language = Language { code: "en" };

    /// Create a Language from a language code string.
    ///
    /// # Arguments
    /// * `code` - Catalog language code (e.g., "hi", "sat", "zh")
    ///
    /// # Returns
    /// * `Ok(Language)` if the code is in the catalog
    /// * `Err(GatewayError::Validation)` otherwise
    pub fn from_code(code: &str) -> Result<Language, GatewayError> {
        LanguageCatalog::get()
            .get_by_code(code)
            .map(|config| Language { code: config.code })
            .ok_or_else(|| GatewayError::validation(format!("Language {} not supported", code)))
    }

    /// Get the language code (e.g., "hi").
    pub fn code(&self) -> &'static str {
        self.code
    }

    /// Full catalog entry for this language.
    ///
    /// # Panics
    /// Never in practice: a `Language` is only built from catalog codes.
    pub fn config(&self) -> &'static LanguageConfig {
        LanguageCatalog::get()
            .get_by_code(self.code)
            .expect("Language code should always be in the catalog")
    }

    /// Get the English display name (e.g., "Hindi").
    pub fn name(&self) -> &'static str {
        self.config().name
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code)
    }
}

/// Requested source language: either `auto` or a catalog language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceLanguage {
    Auto,
    Code(Language),
}

impl SourceLanguage {
    /// Parse a requested source language, validating non-`auto` values
    /// against the catalog.
    ///
    /// # Arguments
    /// * `value` - `"auto"` or a catalog language code
    ///
    /// # Returns
    /// * `Ok(SourceLanguage::Auto)` for `"auto"`
    /// * `Ok(SourceLanguage::Code(..))` for a catalog code
    /// * `Err(GatewayError::Validation)` otherwise
    pub fn parse(value: &str) -> Result<Self, GatewayError> {
        if value == AUTO {
            return Ok(SourceLanguage::Auto);
        }
        Language::from_code(value)
            .map(SourceLanguage::Code)
            .map_err(|_| GatewayError::validation(format!("Source language {} not supported", value)))
    }

    /// Get the wire form: `"auto"` or the language code.
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceLanguage::Auto => AUTO,
            SourceLanguage::Code(language) => language.code(),
        }
    }
}
