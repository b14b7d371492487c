//! Batch translation with per-item failure isolation.
//!
//! A failing item becomes an error marker in its own slot; the batch as a
//! whole never fails because of item content. Size limits are enforced by
//! the API layer before this runs.

use crate::detection::resolve_source;
use crate::engine::Translator;
use crate::i18n::{Language, SourceLanguage};
use futures::stream::{self, StreamExt};
use serde::{Serialize, Serializer};
use tracing::{debug, warn};

/// Largest accepted batch.
pub const MAX_BATCH_SIZE: usize = 50;

/// Result slot for one batch item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchItem {
    Translated(String),
    /// Failure reason, reported in place of the translation
    Failed(String),
}

impl BatchItem {
    pub fn is_failed(&self) -> bool {
        matches!(self, BatchItem::Failed(_))
    }

    /// String form used in responses: the translation, or `Error: <reason>`.
    pub fn as_wire(&self) -> String {
        match self {
            BatchItem::Translated(text) => text.clone(),
            BatchItem::Failed(reason) => format!("Error: {}", reason),
        }
    }
}

impl Serialize for BatchItem {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.as_wire())
    }
}

/// Translate every text, keeping output length and order equal to the input.
///
/// With `source == Auto` each item is detected individually. Up to
/// `concurrency` items are in flight at once; `1` translates sequentially.
pub async fn translate_batch(
    translator: &Translator,
    texts: &[String],
    source: SourceLanguage,
    target: Language,
    concurrency: usize,
) -> Vec<BatchItem> {
    debug!(
        "Translating batch of {} items ({} -> {}, concurrency {})",
        texts.len(),
        source.as_str(),
        target,
        concurrency
    );

    // Each future owns its text. A future borrowing the closure argument is
    // not general over that lifetime and fails axum's handler bound.
    stream::iter(texts.iter().cloned().enumerate())
        .map(|(index, text)| async move {
            translate_item(translator, index, &text, source, target).await
        })
        .buffered(concurrency.max(1))
        .collect()
        .await
}

async fn translate_item(
    translator: &Translator,
    index: usize,
    text: &str,
    source: SourceLanguage,
    target: Language,
) -> BatchItem {
    let resolved = resolve_source(translator, text, source).await;

    match translator
        .translate(text, &resolved.language, target.code())
        .await
    {
        Ok(translated) => BatchItem::Translated(translated),
        Err(e) => {
            warn!("Batch item {} failed: {}", index, e);
            translator.metrics().record_batch_item_failure();
            BatchItem::Failed(e.to_string())
        }
    }
}
