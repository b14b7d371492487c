//! Translation engines.
//!
//! The gateway talks to exactly one engine per process, chosen at startup
//! from `TRANSLATION_BACKEND`. Request handlers never see the engine directly:
//! they go through [`Translator`], which owns the identity short-circuit, the
//! per-call timeout and the engine metrics.

mod cloud;
mod local;

pub use cloud::CloudTranslator;
pub use local::LocalModelTranslator;

use crate::config::{Config, TranslationBackend};
use crate::metrics::GatewayMetrics;
use anyhow::Result;
use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Confidence reported alongside every translation result.
pub const REPORTED_CONFIDENCE: f64 = 0.95;

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("Translation request failed: {0}")]
    Request(String),

    #[error("Translation API error ({status}): {body}")]
    Api { status: u16, body: String },

    #[error("Invalid translation response: {0}")]
    InvalidResponse(String),

    #[error("Translation timed out after {0:?}")]
    Timeout(Duration),

    #[error("Language detection is not supported by {0}")]
    DetectionUnsupported(&'static str),
}

/// A translation backend.
///
/// Implementations receive raw language codes. Codes coming from detection
/// are not guaranteed to be in the catalog.
#[async_trait]
pub trait TranslationEngine: Send + Sync {
    /// Identifier reported as `method` in translation results.
    fn name(&self) -> &'static str;

    async fn translate(&self, text: &str, source: &str, target: &str)
        -> Result<String, EngineError>;

    /// Detect the language of `text`, returning its code.
    async fn detect(&self, _text: &str) -> Result<String, EngineError> {
        Err(EngineError::DetectionUnsupported(self.name()))
    }
}

/// Engine front used by every request path.
#[derive(Clone)]
pub struct Translator {
    engine: Arc<dyn TranslationEngine>,
    timeout: Duration,
    metrics: Arc<GatewayMetrics>,
}

impl Translator {
    pub fn new(
        engine: Arc<dyn TranslationEngine>,
        timeout: Duration,
        metrics: Arc<GatewayMetrics>,
    ) -> Self {
        Self {
            engine,
            timeout,
            metrics,
        }
    }

    /// Engine identifier for responses and health output.
    pub fn method(&self) -> &'static str {
        self.engine.name()
    }

    pub fn metrics(&self) -> &GatewayMetrics {
        &self.metrics
    }

    /// Translate `text`, returning it unchanged without a backend call when
    /// `source == target`.
    pub async fn translate(
        &self,
        text: &str,
        source: &str,
        target: &str,
    ) -> Result<String, EngineError> {
        if source == target {
            debug!("Source and target are both '{}', skipping engine", source);
            return Ok(text.to_string());
        }

        self.metrics.record_engine_call();
        let result = self
            .with_timeout(self.engine.translate(text, source, target))
            .await;

        if let Err(e) = &result {
            self.metrics.record_engine_failure();
            warn!(
                "{} translation {} -> {} failed: {}",
                self.engine.name(),
                source,
                target,
                e
            );
        }

        result
    }

    pub async fn detect(&self, text: &str) -> Result<String, EngineError> {
        self.with_timeout(self.engine.detect(text)).await
    }

    async fn with_timeout<T>(
        &self,
        call: impl Future<Output = Result<T, EngineError>>,
    ) -> Result<T, EngineError> {
        match tokio::time::timeout(self.timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(EngineError::Timeout(self.timeout)),
        }
    }
}

/// Build the engine selected by configuration.
pub fn build_engine(config: &Config, client: reqwest::Client) -> Result<Arc<dyn TranslationEngine>> {
    let engine: Arc<dyn TranslationEngine> = match config.translation_backend {
        TranslationBackend::Cloud => Arc::new(CloudTranslator::new(
            client,
            &config.openai_api_url,
            config.require_openai_api_key()?,
            &config.openai_model,
        )),
        TranslationBackend::Local => Arc::new(LocalModelTranslator::new(
            client,
            &config.local_model_url,
            config.local_model_api_key.clone(),
        )),
    };
    Ok(engine)
}

/// Turn a non-success HTTP response into `EngineError::Api`, keeping the body
/// as the diagnostic message.
pub(crate) async fn error_for_status(
    response: reqwest::Response,
) -> Result<reqwest::Response, EngineError> {
    if response.status().is_success() {
        return Ok(response);
    }

    let status = response.status().as_u16();
    let body = response
        .text()
        .await
        .unwrap_or_else(|e| format!("<failed to read body: {}>", e));
    Err(EngineError::Api { status, body })
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Scripted engine: uppercases text, fails on texts containing "fail",
    /// and detects whatever `detected` holds. `delay` slows both calls.
    #[derive(Default)]
    pub struct FakeEngine {
        pub detected: Option<String>,
        pub delay: Option<Duration>,
        pub translate_calls: AtomicUsize,
        pub detect_calls: AtomicUsize,
    }

    #[async_trait]
    impl TranslationEngine for FakeEngine {
        fn name(&self) -> &'static str {
            "fake"
        }

        async fn translate(
            &self,
            text: &str,
            source: &str,
            target: &str,
        ) -> Result<String, EngineError> {
            self.translate_calls.fetch_add(1, Ordering::SeqCst);
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            if text.contains("fail") {
                return Err(EngineError::Api {
                    status: 500,
                    body: format!("cannot translate '{}'", text),
                });
            }
            Ok(format!("[{}->{}] {}", source, target, text.to_uppercase()))
        }

        async fn detect(&self, _text: &str) -> Result<String, EngineError> {
            self.detect_calls.fetch_add(1, Ordering::SeqCst);
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            self.detected
                .clone()
                .ok_or_else(|| EngineError::InvalidResponse("no language detected".to_string()))
        }
    }

    pub fn translator(engine: Arc<FakeEngine>) -> Translator {
        Translator::new(engine, Duration::from_secs(5), Arc::new(GatewayMetrics::new()))
    }
}
