use anyhow::{bail, Context, Result};
use std::path::PathBuf;
use std::time::Duration;

/// Which translation engine the process talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranslationBackend {
    /// Hosted chat-completions API
    Cloud,
    /// Self-hosted server running local sequence-to-sequence models
    Local,
}

impl TranslationBackend {
    pub fn parse(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "cloud" => Ok(Self::Cloud),
            "local" => Ok(Self::Local),
            other => bail!(
                "Unknown TRANSLATION_BACKEND '{}'. Expected 'cloud' or 'local'",
                other
            ),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    // Server
    pub bind_addr: String,
    pub port: u16,

    // Translation engine
    pub translation_backend: TranslationBackend,
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    pub openai_api_url: String,
    pub local_model_url: String,
    pub local_model_api_key: Option<String>,

    // Speech synthesis
    pub tts_service_url: String,
    pub tts_api_key: Option<String>,

    // Model registry
    pub models_dir: PathBuf,

    // Backend calls
    pub request_timeout: Duration,
    pub batch_concurrency: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let translation_backend = TranslationBackend::parse(
            &std::env::var("TRANSLATION_BACKEND").unwrap_or_else(|_| "cloud".to_string()),
        )?;

        let openai_api_key = non_empty_var("OPENAI_API_KEY");
        if translation_backend == TranslationBackend::Cloud && openai_api_key.is_none() {
            bail!("OPENAI_API_KEY not set (required when TRANSLATION_BACKEND=cloud)");
        }

        Ok(Self {
            // Server
            bind_addr: std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5001),

            // Translation engine
            translation_backend,
            openai_api_key,
            openai_model: std::env::var("OPENAI_MODEL")
                .unwrap_or_else(|_| "gpt-4o-mini".to_string()),
            openai_api_url: std::env::var("OPENAI_API_URL")
                .unwrap_or_else(|_| "https://api.openai.com/v1/chat/completions".to_string()),
            local_model_url: std::env::var("LOCAL_MODEL_URL")
                .unwrap_or_else(|_| "http://localhost:5000".to_string()),
            local_model_api_key: non_empty_var("LOCAL_MODEL_API_KEY"),

            // Speech synthesis
            tts_service_url: std::env::var("TTS_SERVICE_URL")
                .unwrap_or_else(|_| "http://localhost:5002/synthesize".to_string()),
            tts_api_key: non_empty_var("TTS_API_KEY"),

            // Model registry
            models_dir: std::env::var("MODELS_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("models")),

            // Backend calls
            request_timeout: Duration::from_secs(
                std::env::var("REQUEST_TIMEOUT_SECS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(30),
            ),
            batch_concurrency: std::env::var("BATCH_CONCURRENCY")
                .ok()
                .and_then(|v| v.parse::<usize>().ok())
                .unwrap_or(1)
                .max(1),
        })
    }

    /// Address string suitable for `TcpListener::bind`.
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }

    /// API key for the cloud backend, failing if it was never configured.
    pub fn require_openai_api_key(&self) -> Result<&str> {
        self.openai_api_key
            .as_deref()
            .context("OPENAI_API_KEY not set")
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}
