//! Language support for the gateway.
//!
//! - `registry`: the immutable language catalog (code -> display name)
//! - `language`: validated `Language` handles and the `auto` source marker
//!
//! # Example
//!
//! ```rust,ignore
//! use translation_gateway::i18n::{Language, LanguageCatalog, SourceLanguage};
//!
//! let hindi = Language::from_code("hi")?;
//! let source = SourceLanguage::parse("auto")?;
//! let supported = LanguageCatalog::get().is_supported("fr");
//! ```

mod language;
mod registry;

pub use language::{Language, SourceLanguage, AUTO};
pub use registry::{LanguageCatalog, LanguageConfig, Region};
