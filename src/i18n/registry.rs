//! Language catalog: Single source of truth for all supported languages.
//!
//! The catalog is fixed at process start and never mutated afterwards, so it
//! is held in a `OnceLock` and shared by reference across request handlers.

use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::OnceLock;

/// Grouping used by clients to split the language picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Region {
    Indian,
    Foreign,
}

/// Configuration for a supported language.
#[derive(Debug, Clone)]
pub struct LanguageConfig {
    /// Language code (ISO 639-1 where one exists, ISO 639-2/3 otherwise)
    pub code: &'static str,

    /// English display name (e.g., "Hindi", "French")
    pub name: &'static str,

    pub region: Region,
}

/// Immutable catalog of supported languages.
pub struct LanguageCatalog {
    languages: Vec<LanguageConfig>,
}

/// Global catalog instance (initialized lazily)
static CATALOG: OnceLock<LanguageCatalog> = OnceLock::new();

impl LanguageCatalog {
    /// Get the process-wide catalog.
    pub fn get() -> &'static LanguageCatalog {
        CATALOG.get_or_init(|| LanguageCatalog {
            languages: default_languages(),
        })
    }

    /// Get a language configuration by its code.
    ///
    /// Codes are compared by exact string equality, so `"HI"` is not `"hi"`.
    pub fn get_by_code(&self, code: &str) -> Option<&LanguageConfig> {
        self.languages.iter().find(|lang| lang.code == code)
    }

    /// Check whether a code is present in the catalog.
    pub fn is_supported(&self, code: &str) -> bool {
        self.get_by_code(code).is_some()
    }

    /// Full code -> display name mapping, as served by `GET /languages`.
    pub fn all(&self) -> BTreeMap<&'static str, &'static str> {
        self.languages
            .iter()
            .map(|lang| (lang.code, lang.name))
            .collect()
    }

    /// Code -> display name mapping restricted to one region.
    pub fn by_region(&self, region: Region) -> BTreeMap<&'static str, &'static str> {
        self.languages
            .iter()
            .filter(|lang| lang.region == region)
            .map(|lang| (lang.code, lang.name))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.languages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.languages.is_empty()
    }
}

fn default_languages() -> Vec<LanguageConfig> {
    const INDIAN: &[(&str, &str)] = &[
        ("hi", "Hindi"),
        ("bn", "Bengali"),
        ("te", "Telugu"),
        ("mr", "Marathi"),
        ("ta", "Tamil"),
        ("gu", "Gujarati"),
        ("kn", "Kannada"),
        ("ml", "Malayalam"),
        ("pa", "Punjabi"),
        ("or", "Odia"),
        ("as", "Assamese"),
        ("ks", "Kashmiri"),
        ("sd", "Sindhi"),
        ("ne", "Nepali"),
        ("sa", "Sanskrit"),
        ("ur", "Urdu"),
        ("kok", "Konkani"),
        ("mai", "Maithili"),
        ("sat", "Santali"),
        ("doi", "Dogri"),
        ("mni", "Manipuri"),
        ("brx", "Bodo"),
    ];
    const FOREIGN: &[(&str, &str)] = &[
        ("en", "English"),
        ("es", "Spanish"),
        ("fr", "French"),
        ("zh", "Chinese"),
        ("ar", "Arabic"),
    ];

    let indian = INDIAN.iter().map(|&(code, name)| LanguageConfig {
        code,
        name,
        region: Region::Indian,
    });
    let foreign = FOREIGN.iter().map(|&(code, name)| LanguageConfig {
        code,
        name,
        region: Region::Foreign,
    });

    indian.chain(foreign).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_catalog_get_returns_singleton() {
        let catalog1 = LanguageCatalog::get();
        let catalog2 = LanguageCatalog::get();

        assert!(std::ptr::eq(catalog1, catalog2));
    }

    #[test]
    fn test_catalog_size() {
        let catalog = LanguageCatalog::get();
        assert_eq!(catalog.len(), 27);
        assert!(!catalog.is_empty());
    }

    #[test]
    fn test_codes_are_unique() {
        let catalog = LanguageCatalog::get();
        let unique: HashSet<_> = catalog.languages.iter().map(|l| l.code).collect();
        assert_eq!(unique.len(), catalog.len());
    }

    #[test]
    fn test_get_by_code_hindi() {
        let config = LanguageCatalog::get().get_by_code("hi").expect("hi is supported");
        assert_eq!(config.name, "Hindi");
        assert_eq!(config.region, Region::Indian);
    }

    #[test]
    fn test_get_by_code_three_letter() {
        let config = LanguageCatalog::get().get_by_code("kok").expect("kok is supported");
        assert_eq!(config.name, "Konkani");
    }

    #[test]
    fn test_is_supported() {
        let catalog = LanguageCatalog::get();
        assert!(catalog.is_supported("en"));
        assert!(catalog.is_supported("brx"));
        assert!(!catalog.is_supported("de"));
        assert!(!catalog.is_supported("auto"));
        assert!(!catalog.is_supported(""));
    }

    #[test]
    fn test_is_supported_is_case_sensitive() {
        assert!(!LanguageCatalog::get().is_supported("EN"));
    }

    #[test]
    fn test_all_contains_every_language() {
        let all = LanguageCatalog::get().all();
        assert_eq!(all.len(), 27);
        assert_eq!(all.get("fr"), Some(&"French"));
        assert_eq!(all.get("mni"), Some(&"Manipuri"));
    }

    #[test]
    fn test_by_region_partitions_catalog() {
        let catalog = LanguageCatalog::get();
        let indian = catalog.by_region(Region::Indian);
        let foreign = catalog.by_region(Region::Foreign);

        assert_eq!(indian.len(), 22);
        assert_eq!(foreign.len(), 5);
        assert!(foreign.contains_key("en"));
        assert!(!indian.contains_key("en"));
    }

    #[test]
    fn test_region_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Region::Indian).unwrap(), "\"indian\"");
        assert_eq!(serde_json::to_string(&Region::Foreign).unwrap(), "\"foreign\"");
    }
}
