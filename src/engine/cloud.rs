use super::{error_for_status, EngineError, TranslationEngine};
use crate::i18n::LanguageCatalog;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// OpenAI-compatible Chat Completion request
#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<Message>,
    temperature: f32,
}

#[derive(Debug, Serialize, Deserialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Message,
}

/// Cloud translation through a hosted chat-completions API.
pub struct CloudTranslator {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    model: String,
}

/// Display name for prompts; detected codes outside the catalog are passed as-is.
fn language_label(code: &str) -> String {
    match LanguageCatalog::get().get_by_code(code) {
        Some(config) => format!("{} ({})", config.name, code),
        None => code.to_string(),
    }
}

fn build_translation_system_prompt(source: &str, target: &str) -> String {
    format!(
        r#"You are a professional translator. Translate the user's text from {} to {}.

### Rules:
- Output only the translated text, with no explanations, quotes or notes
- Preserve line breaks, punctuation and numbers
- Keep URLs, email addresses and code unchanged
- If a term has no good translation, keep the original term"#,
        language_label(source),
        language_label(target)
    )
}

const DETECTION_SYSTEM_PROMPT: &str = "Identify the language of the user's text. \
Reply with only its ISO 639-1 code (ISO 639-3 if no two-letter code exists), \
in lowercase, with nothing else.";

/// Accept a bare 2-3 letter code, tolerating surrounding whitespace and a trailing period.
fn parse_detected_code(reply: &str) -> Result<String, EngineError> {
    let code = reply.trim().trim_end_matches('.').to_ascii_lowercase();
    let valid = (2..=3).contains(&code.len()) && code.chars().all(|c| c.is_ascii_lowercase());
    if valid {
        Ok(code)
    } else {
        Err(EngineError::InvalidResponse(format!(
            "expected a language code, got '{}'",
            reply.trim()
        )))
    }
}

impl CloudTranslator {
    pub fn new(client: reqwest::Client, api_url: &str, api_key: &str, model: &str) -> Self {
        Self {
            client,
            api_url: api_url.to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
        }
    }

    async fn complete(&self, system: String, user: &str, temperature: f32) -> Result<String, EngineError> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                Message {
                    role: "system".to_string(),
                    content: system,
                },
                Message {
                    role: "user".to_string(),
                    content: user.to_string(),
                },
            ],
            temperature,
        };

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| EngineError::Request(format!("Failed to reach chat completions API: {}", e)))?;

        let chat_response: ChatResponse = error_for_status(response)
            .await?
            .json()
            .await
            .map_err(|e| EngineError::InvalidResponse(format!("Failed to parse chat response: {}", e)))?;

        chat_response
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| EngineError::InvalidResponse("chat response contained no choices".to_string()))
    }
}

#[async_trait]
impl TranslationEngine for CloudTranslator {
    fn name(&self) -> &'static str {
        "cloud-api"
    }

    async fn translate(&self, text: &str, source: &str, target: &str) -> Result<String, EngineError> {
        let translated = self
            .complete(build_translation_system_prompt(source, target), text, 0.3)
            .await?;
        Ok(translated.trim().to_string())
    }

    async fn detect(&self, text: &str) -> Result<String, EngineError> {
        let reply = self
            .complete(DETECTION_SYSTEM_PROMPT.to_string(), text, 0.0)
            .await?;
        parse_detected_code(&reply)
    }
}
