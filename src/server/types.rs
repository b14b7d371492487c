//! Request and response bodies for the HTTP API.

use crate::batch::BatchItem;
use crate::metrics::MetricsReport;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ==================== Requests ====================

/// `POST /translate`. Missing fields take their defaults in the handler.
#[derive(Debug, Default, Deserialize)]
pub struct TranslateRequest {
    pub text: Option<String>,
    pub source_lang: Option<String>,
    pub target_lang: Option<String>,
}

/// `POST /translate/batch`
#[derive(Debug, Default, Deserialize)]
pub struct BatchTranslateRequest {
    pub texts: Option<Vec<String>>,
    pub source_lang: Option<String>,
    pub target_lang: Option<String>,
}

/// `POST /tts`
#[derive(Debug, Default, Deserialize)]
pub struct SpeechRequest {
    pub text: Option<String>,
    pub lang: Option<String>,
}

/// `POST /models/download` and `POST /models/delete`
#[derive(Debug, Default, Deserialize)]
pub struct ModelRequest {
    pub language: Option<String>,
}

// ==================== Responses ====================

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub translator: &'static str,
    pub speech: &'static str,
    pub timestamp: DateTime<Utc>,
    pub metrics: MetricsReport,
}

#[derive(Debug, Serialize)]
pub struct TranslationResult {
    pub translated_text: String,
    pub source_lang: String,
    pub target_lang: String,
    pub detected_lang: Option<String>,
    pub confidence: f64,
    pub method: &'static str,
}

#[derive(Debug, Serialize)]
pub struct BatchTranslationResponse {
    pub translations: Vec<BatchItem>,
    pub total: usize,
    pub source_lang: String,
    pub target_lang: String,
}

#[derive(Debug, Serialize)]
pub struct LanguagesResponse {
    pub languages: BTreeMap<&'static str, &'static str>,
    pub total: usize,
    pub regions: RegionLanguages,
}

#[derive(Debug, Serialize)]
pub struct RegionLanguages {
    pub indian: BTreeMap<&'static str, &'static str>,
    pub foreign: BTreeMap<&'static str, &'static str>,
}

#[derive(Debug, Serialize)]
pub struct ModelStatusResponse {
    pub success: bool,
    pub downloaded: Vec<String>,
    pub storage_path: String,
}

#[derive(Debug, Serialize)]
pub struct ModelActionResponse {
    pub success: bool,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translate_request_all_fields_optional() {
        let request: TranslateRequest = serde_json::from_str("{}").unwrap();
        assert!(request.text.is_none());
        assert!(request.source_lang.is_none());
        assert!(request.target_lang.is_none());
    }

    #[test]
    fn test_batch_request_rejects_non_array_texts() {
        let result: Result<BatchTranslateRequest, _> =
            serde_json::from_str(r#"{"texts": "hello"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_translation_result_serializes_null_detection() {
        let result = TranslationResult {
            translated_text: "नमस्ते".to_string(),
            source_lang: "en".to_string(),
            target_lang: "hi".to_string(),
            detected_lang: None,
            confidence: 0.95,
            method: "cloud-api",
        };

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["detected_lang"], serde_json::Value::Null);
        assert_eq!(json["method"], "cloud-api");
        assert_eq!(json["confidence"], 0.95);
    }
}
