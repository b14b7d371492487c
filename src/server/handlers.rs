use super::types::*;
use super::AppState;
use crate::batch::{translate_batch, MAX_BATCH_SIZE};
use crate::detection::resolve_source;
use crate::engine::REPORTED_CONFIDENCE;
use crate::error::GatewayError;
use crate::i18n::{Language, LanguageCatalog, Region, SourceLanguage, AUTO};
use crate::speech::AUDIO_MIME_TYPE;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use std::sync::Arc;
use tracing::info;

/// Longest text accepted by `/translate` and `/tts`, in characters.
pub const MAX_TEXT_CHARS: usize = 5000;

type ApiResult<T> = Result<Json<T>, GatewayError>;

/// Unwrap a JSON body, reporting malformed input as a validation error.
fn parse_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, GatewayError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| GatewayError::validation(rejection.body_text()))
}

/// Require non-empty text of at most `MAX_TEXT_CHARS` characters.
/// Whitespace-only text is accepted.
fn require_text(text: Option<String>) -> Result<String, GatewayError> {
    let text = text.unwrap_or_default();
    if text.is_empty() {
        return Err(GatewayError::validation("Text is required"));
    }
    if text.chars().count() > MAX_TEXT_CHARS {
        return Err(GatewayError::validation(format!(
            "Text length exceeds maximum limit of {} characters",
            MAX_TEXT_CHARS
        )));
    }
    Ok(text)
}

/// Resolve the target language, defaulting to English.
fn target_language(target: Option<String>) -> Result<Language, GatewayError> {
    let target = target.unwrap_or_else(|| Language::ENGLISH.code().to_string());
    Language::from_code(&target)
        .map_err(|_| GatewayError::validation(format!("Target language {} not supported", target)))
}

fn source_language(source: Option<String>) -> Result<SourceLanguage, GatewayError> {
    SourceLanguage::parse(source.as_deref().unwrap_or(AUTO))
}

fn require_language_code(language: Option<String>) -> Result<String, GatewayError> {
    language
        .map(|code| code.trim().to_string())
        .filter(|code| !code.is_empty())
        .ok_or_else(|| GatewayError::validation("Language code required"))
}

/// `GET /health`: liveness, configured backends and metrics.
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        service: "Translation & Speech Gateway",
        translator: state.translator.method(),
        speech: state.speech.backend(),
        timestamp: Utc::now(),
        metrics: state.metrics.report(),
    })
}

/// `POST /translate`: translate a single text.
///
/// # Errors
/// * 400 for missing or oversized text, or an unsupported language
/// * 500 when the engine fails or times out
///
/// Detection failures never surface; the source falls back to English.
pub async fn translate(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<TranslateRequest>, JsonRejection>,
) -> ApiResult<TranslationResult> {
    let request = parse_body(payload)?;
    let text = require_text(request.text)?;
    let target = target_language(request.target_lang)?;
    let source = source_language(request.source_lang)?;

    info!("Translation request: {} -> {}", source.as_str(), target);

    let resolved = resolve_source(&state.translator, &text, source).await;
    let translated_text = state
        .translator
        .translate(&text, &resolved.language, target.code())
        .await?;

    Ok(Json(TranslationResult {
        translated_text,
        source_lang: resolved.language,
        target_lang: target.code().to_string(),
        detected_lang: resolved.detected,
        confidence: REPORTED_CONFIDENCE,
        method: state.translator.method(),
    }))
}

/// `POST /translate/batch`: translate up to `MAX_BATCH_SIZE` texts.
///
/// # Errors
/// * 400 for a missing, empty or oversized `texts` array, or an unsupported
///   language
///
/// Per-item engine failures are embedded as `Error: <reason>` and never fail
/// the request.
pub async fn translate_batch_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<BatchTranslateRequest>, JsonRejection>,
) -> ApiResult<BatchTranslationResponse> {
    let request = parse_body(payload)?;
    let texts = request.texts.unwrap_or_default();
    if texts.is_empty() {
        return Err(GatewayError::validation("Texts array is required"));
    }
    if texts.len() > MAX_BATCH_SIZE {
        return Err(GatewayError::validation(format!(
            "Maximum {} texts allowed",
            MAX_BATCH_SIZE
        )));
    }
    let target = target_language(request.target_lang)?;
    let source = source_language(request.source_lang)?;

    info!(
        "Batch translation request: {} items, {} -> {}",
        texts.len(),
        source.as_str(),
        target
    );

    let translations = translate_batch(
        &state.translator,
        &texts,
        source,
        target,
        state.batch_concurrency,
    )
    .await;

    Ok(Json(BatchTranslationResponse {
        total: translations.len(),
        translations,
        source_lang: source.as_str().to_string(),
        target_lang: target.code().to_string(),
    }))
}

/// `POST /tts`: synthesize speech, returning `audio/mpeg` bytes.
///
/// # Errors
/// * 400 for missing or oversized text, or an unsupported `lang`
/// * 500 when the speech backend fails or times out
pub async fn text_to_speech(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SpeechRequest>, JsonRejection>,
) -> Result<Response, GatewayError> {
    let request = parse_body(payload)?;
    let text = require_text(request.text)?;
    let lang = request
        .lang
        .unwrap_or_else(|| Language::ENGLISH.code().to_string());
    let lang = Language::from_code(&lang)?;

    info!("TTS request: {} characters in {}", text.chars().count(), lang);

    state.metrics.record_synthesis_call();
    let audio = state.speech.synthesize(&text, lang.code()).await?;

    Ok(([(header::CONTENT_TYPE, AUDIO_MIME_TYPE)], audio).into_response())
}

/// `GET /languages`: the full catalog, grouped by region.
pub async fn languages() -> Json<LanguagesResponse> {
    let catalog = LanguageCatalog::get();
    Json(LanguagesResponse {
        languages: catalog.all(),
        total: catalog.len(),
        regions: RegionLanguages {
            indian: catalog.by_region(Region::Indian),
            foreign: catalog.by_region(Region::Foreign),
        },
    })
}

/// `GET /models/status`: codes marked as downloaded and the storage path.
pub async fn models_status(State(state): State<Arc<AppState>>) -> ApiResult<ModelStatusResponse> {
    let registry = state.models.clone();
    let downloaded = tokio::task::spawn_blocking(move || registry.list()).await??;

    Ok(Json(ModelStatusResponse {
        success: true,
        downloaded,
        storage_path: state.models.storage_path().display().to_string(),
    }))
}

/// `POST /models/download`: mark a catalog language as downloaded.
///
/// Idempotent. Codes outside the catalog get 400.
pub async fn download_model(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ModelRequest>, JsonRejection>,
) -> ApiResult<ModelActionResponse> {
    let request = parse_body(payload)?;
    let code = require_language_code(request.language)?;
    let language = Language::from_code(&code)?;

    let registry = state.models.clone();
    tokio::task::spawn_blocking(move || registry.add(language.code())).await??;

    Ok(Json(ModelActionResponse {
        success: true,
        message: format!("Model for {} marked as downloaded", language),
    }))
}

/// `POST /models/delete`: unmark a language code.
///
/// Idempotent. Any non-empty code is accepted so stale entries can be removed.
pub async fn delete_model(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ModelRequest>, JsonRejection>,
) -> ApiResult<ModelActionResponse> {
    let request = parse_body(payload)?;
    let code = require_language_code(request.language)?;

    let registry = state.models.clone();
    let message = format!("Model for {} removed", code);
    tokio::task::spawn_blocking(move || registry.remove(&code)).await??;

    Ok(Json(ModelActionResponse {
        success: true,
        message,
    }))
}
