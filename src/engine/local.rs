use super::{error_for_status, EngineError, TranslationEngine};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
struct TranslateBody<'a> {
    q: &'a str,
    source: &'a str,
    target: &'a str,
    format: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    api_key: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TranslateReply {
    translated_text: String,
}

#[derive(Debug, Serialize)]
struct DetectBody<'a> {
    q: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    api_key: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct DetectCandidate {
    language: String,
    confidence: f64,
}

/// Local sequence-to-sequence models served over a LibreTranslate-compatible
/// HTTP API (`POST /translate`, `POST /detect`).
pub struct LocalModelTranslator {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl LocalModelTranslator {
    pub fn new(client: reqwest::Client, base_url: &str, api_key: Option<String>) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        }
    }
}

#[async_trait]
impl TranslationEngine for LocalModelTranslator {
    fn name(&self) -> &'static str {
        "local-model"
    }

    async fn translate(&self, text: &str, source: &str, target: &str) -> Result<String, EngineError> {
        let body = TranslateBody {
            q: text,
            source,
            target,
            format: "text",
            api_key: self.api_key.as_deref(),
        };

        let response = self
            .client
            .post(format!("{}/translate", self.base_url))
            .json(&body)
            .send()
            .await
            .map_err(|e| EngineError::Request(format!("Local model server unreachable: {}", e)))?;

        let reply: TranslateReply = error_for_status(response)
            .await?
            .json()
            .await
            .map_err(|e| EngineError::InvalidResponse(format!("Failed to parse translate response: {}", e)))?;

        Ok(reply.translated_text)
    }

    async fn detect(&self, text: &str) -> Result<String, EngineError> {
        let body = DetectBody {
            q: text,
            api_key: self.api_key.as_deref(),
        };

        let response = self
            .client
            .post(format!("{}/detect", self.base_url))
            .json(&body)
            .send()
            .await
            .map_err(|e| EngineError::Request(format!("Local model server unreachable: {}", e)))?;

        let candidates: Vec<DetectCandidate> = error_for_status(response)
            .await?
            .json()
            .await
            .map_err(|e| EngineError::InvalidResponse(format!("Failed to parse detect response: {}", e)))?;

        candidates
            .into_iter()
            .max_by(|a, b| a.confidence.total_cmp(&b.confidence))
            .map(|best| best.language)
            .ok_or_else(|| EngineError::InvalidResponse("no language detected".to_string()))
    }
}
