//! Gemini generateContent provider.
//!
//! Single-shot generation against the Generative Language API. Caller-facing
//! short model names are mapped to canonical `models/...` identifiers;
//! unrecognized names pass through with the `models/` prefix. The request
//! pins temperature 0.3 and `responseMimeType: application/json`, and the
//! system instruction is folded into the single prompt since the API takes
//! one content string.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{CompletionProvider, DEFAULT_MAX_TOKENS, TEMPERATURE};
use crate::classify::classify_provider_error;
use crate::prompt::SYSTEM_PROMPT;
use crate::types::AgentError;

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Map short/legacy model names onto canonical identifiers. Retired 1.5
/// aliases resolve to their 2.5 successors.
fn canonical_model(model: &str) -> String {
    match model.to_lowercase().as_str() {
        "gemini-2.5-flash-lite" => "models/gemini-2.5-flash".to_string(),
        "gemini-2.5-flash" => "models/gemini-2.5-flash".to_string(),
        "gemini-2.5-pro" => "models/gemini-2.5-pro".to_string(),
        "gemini-1.5-flash-lite" => "models/gemini-2.5-flash".to_string(),
        "gemini-1.5-flash" => "models/gemini-2.5-flash".to_string(),
        "gemini-flash" => "models/gemini-2.5-flash".to_string(),
        "gemini-pro" => "models/gemini-2.5-pro".to_string(),
        other => format!("models/{other}"),
    }
}

// ---------------------------------------------------------------------------
// API types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f64,
    max_output_tokens: u32,
    response_mime_type: &'static str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

pub struct GeminiClient {
    http: Client,
    api_key: String,
    model: String,
    max_tokens: u32,
}

impl GeminiClient {
    pub fn new(
        api_key: String,
        model: Option<String>,
        max_tokens: Option<u32>,
    ) -> Result<Self, AgentError> {
        let http = Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .build()
            .map_err(|e| AgentError::Configuration(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            api_key,
            model: canonical_model(model.as_deref().unwrap_or(DEFAULT_MODEL)),
            max_tokens: max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{GEMINI_API_BASE}/{}:generateContent?key={}",
            self.model,
            urlencoding::encode(&self.api_key)
        )
    }
}

#[async_trait]
impl CompletionProvider for GeminiClient {
    async fn complete(&self, prompt: &str) -> Result<String, AgentError> {
        // No separate system role: fold the instruction into the prompt.
        let full_prompt = format!(
            "{SYSTEM_PROMPT}\n\n{prompt}\n\nIMPORTANT: Respond ONLY with valid JSON. \
             Do not include any text before or after the JSON object."
        );

        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: full_prompt }],
            }],
            generation_config: GenerationConfig {
                temperature: TEMPERATURE,
                max_output_tokens: self.max_tokens,
                response_mime_type: "application/json",
            },
        };

        debug!(model = %self.model, prompt_len = prompt.len(), "Calling Gemini generateContent");

        let response = self
            .http
            .post(self.endpoint())
            .json(&request)
            .send()
            .await
            .map_err(|e| classify_provider_error(&format!("Gemini request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_provider_error(&format!(
                "Gemini API error HTTP {status}: {body}"
            )));
        }

        let body: GenerateResponse = response.json().await.map_err(|e| {
            AgentError::Unclassified(format!("Failed to decode Gemini response: {e}"))
        })?;

        let text = body
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| {
                c.parts
                    .into_iter()
                    .map(|p| p.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        if text.is_empty() {
            return Err(AgentError::Unclassified(
                "Gemini response contained no candidates".to_string(),
            ));
        }

        Ok(text)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
