//! HTTP API surface.
//!
//! Handlers validate input, delegate to the engine, batch, speech and
//! registry components, and convert every failure through `GatewayError`.

pub mod handlers;
pub mod types;

use crate::config::Config;
use crate::engine::{build_engine, TranslationEngine, Translator};
use crate::metrics::GatewayMetrics;
use crate::model_registry::ModelRegistry;
use crate::speech::{HttpSpeechSynthesizer, Speech, SpeechSynthesizer};
use anyhow::{Context, Result};
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Shared state handed to every handler.
pub struct AppState {
    pub translator: Translator,
    pub speech: Speech,
    pub models: ModelRegistry,
    pub metrics: Arc<GatewayMetrics>,
    pub batch_concurrency: usize,
}

impl AppState {
    pub fn new(
        engine: Arc<dyn TranslationEngine>,
        synthesizer: Arc<dyn SpeechSynthesizer>,
        models: ModelRegistry,
        timeout: Duration,
        batch_concurrency: usize,
    ) -> Self {
        let metrics = Arc::new(GatewayMetrics::new());
        Self {
            translator: Translator::new(engine, timeout, Arc::clone(&metrics)),
            speech: Speech::new(synthesizer, timeout),
            models,
            metrics,
            batch_concurrency: batch_concurrency.max(1),
        }
    }

    /// Wire up the configured engine, speech backend and registry.
    pub fn from_config(config: &Config) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .context("Failed to build HTTP client")?;

        let engine = build_engine(config, client.clone())?;
        let synthesizer = Arc::new(HttpSpeechSynthesizer::new(
            client,
            &config.tts_service_url,
            config.tts_api_key.clone(),
        ));

        Ok(Self::new(
            engine,
            synthesizer,
            ModelRegistry::new(&config.models_dir),
            config.request_timeout,
            config.batch_concurrency,
        ))
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/translate", post(handlers::translate))
        .route("/translate/batch", post(handlers::translate_batch_handler))
        .route("/tts", post(handlers::text_to_speech))
        .route("/languages", get(handlers::languages))
        .route("/models/status", get(handlers::models_status))
        .route("/models/download", post(handlers::download_model))
        .route("/models/delete", post(handlers::delete_model))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Bind and serve until Ctrl+C.
pub async fn serve(config: &Config) -> Result<()> {
    let state = Arc::new(AppState::from_config(config)?);

    info!(
        "Translator: {}, speech: {}, models dir: {}",
        state.translator.method(),
        state.speech.backend(),
        state.models.storage_path().display()
    );

    let listener = tokio::net::TcpListener::bind(config.listen_addr())
        .await
        .with_context(|| format!("Failed to bind {}", config.listen_addr()))?;

    info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
