//! Text-to-speech synthesis.
//!
//! Output is always MP3 (`audio/mpeg`); there is no caching and no format
//! negotiation.

use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

pub const AUDIO_MIME_TYPE: &str = "audio/mpeg";

#[derive(Debug, thiserror::Error)]
pub enum SynthesisError {
    #[error("Speech synthesis request failed: {0}")]
    Request(String),

    #[error("Speech synthesis API error ({status}): {body}")]
    Api { status: u16, body: String },

    #[error("Speech synthesis returned no audio")]
    EmptyAudio,

    #[error("Speech synthesis timed out after {0:?}")]
    Timeout(Duration),
}

/// A speech synthesis backend.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    fn name(&self) -> &'static str;

    /// Synthesize `text` spoken in `lang`, returning MP3 bytes.
    async fn synthesize(&self, text: &str, lang: &str) -> Result<Vec<u8>, SynthesisError>;
}

#[derive(Debug, Serialize)]
struct SynthesizeBody<'a> {
    text: &'a str,
    lang: &'a str,
    format: &'static str,
}

/// Speech service reached over HTTP: `POST {text, lang, format: "mp3"}`,
/// answered with raw audio bytes.
pub struct HttpSpeechSynthesizer {
    client: reqwest::Client,
    url: String,
    api_key: Option<String>,
}

impl HttpSpeechSynthesizer {
    pub fn new(client: reqwest::Client, url: &str, api_key: Option<String>) -> Self {
        Self {
            client,
            url: url.to_string(),
            api_key,
        }
    }
}

#[async_trait]
impl SpeechSynthesizer for HttpSpeechSynthesizer {
    fn name(&self) -> &'static str {
        "http-tts"
    }

    async fn synthesize(&self, text: &str, lang: &str) -> Result<Vec<u8>, SynthesisError> {
        let mut request = self.client.post(&self.url).json(&SynthesizeBody {
            text,
            lang,
            format: "mp3",
        });
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| SynthesisError::Request(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(SynthesisError::Api { status, body });
        }

        let audio = response
            .bytes()
            .await
            .map_err(|e| SynthesisError::Request(format!("Failed to read audio: {}", e)))?;

        if audio.is_empty() {
            return Err(SynthesisError::EmptyAudio);
        }
        Ok(audio.to_vec())
    }
}

/// Applies the per-call timeout to any synthesizer.
#[derive(Clone)]
pub struct Speech {
    synthesizer: Arc<dyn SpeechSynthesizer>,
    timeout: Duration,
}

impl Speech {
    pub fn new(synthesizer: Arc<dyn SpeechSynthesizer>, timeout: Duration) -> Self {
        Self {
            synthesizer,
            timeout,
        }
    }

    pub fn backend(&self) -> &'static str {
        self.synthesizer.name()
    }

    pub async fn synthesize(&self, text: &str, lang: &str) -> Result<Vec<u8>, SynthesisError> {
        match tokio::time::timeout(self.timeout, self.synthesizer.synthesize(text, lang)).await {
            Ok(result) => result,
            Err(_) => Err(SynthesisError::Timeout(self.timeout)),
        }
    }
}
