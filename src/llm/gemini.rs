// ABOUTME: Google Gemini API client implementation.
// ABOUTME: Implements CompletionClient against the generateContent endpoint.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{ChatMessage, Completion, Role, Transcript, Usage};
use crate::error::LlmError;

const GEMINI_DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_MODEL: &str = "gemini-2.5-flash";
const DEFAULT_TEMPERATURE: f64 = 0.1;
const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Gemini API request format.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiRequest {
    pub contents: Vec<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GeminiGenerationConfig>,
}

/// Gemini content (message).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiContent {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    pub parts: Vec<GeminiPart>,
}

/// Gemini content part.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiPart {
    pub text: String,
}

/// Gemini generation config.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiGenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
}

/// Gemini API response format.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiResponse {
    pub candidates: Vec<GeminiCandidate>,
    #[serde(default)]
    pub usage_metadata: Option<GeminiUsageMetadata>,
}

/// Gemini response candidate.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiCandidate {
    pub content: GeminiContent,
}

/// Gemini usage metadata.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiUsageMetadata {
    #[serde(default)]
    pub prompt_token_count: u32,
    #[serde(default)]
    pub candidates_token_count: u32,
}

/// Gemini API error response.
#[derive(Debug, Deserialize)]
pub struct GeminiError {
    pub error: GeminiErrorDetail,
}

#[derive(Debug, Deserialize)]
pub struct GeminiErrorDetail {
    pub code: i32,
    pub message: String,
    pub status: String,
}

/// Client for the Google Gemini API.
///
/// Model and sampling temperature are fixed per instance.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    api_key: String,
    model: String,
    temperature: f64,
    base_url: String,
    http: reqwest::Client,
}

impl GeminiClient {
    /// Create a new Gemini client with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .expect("Failed to create HTTP client");
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            base_url: GEMINI_DEFAULT_BASE_URL.to_string(),
            http,
        }
    }

    /// Create a new Gemini client from environment variables.
    /// Checks GEMINI_API_KEY first, then falls back to GOOGLE_API_KEY.
    pub fn from_env() -> Result<Self, LlmError> {
        let api_key = std::env::var("GEMINI_API_KEY")
            .or_else(|_| std::env::var("GOOGLE_API_KEY"))
            .map_err(|_| {
                LlmError::Configuration(
                    "GEMINI_API_KEY or GOOGLE_API_KEY environment variable not set".to_string(),
                )
            })?;
        Ok(Self::new(api_key))
    }

    /// Override the model identifier.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Override the sampling temperature.
    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    /// Override the base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Override the request timeout.
    pub fn with_timeout(mut self, timeout: std::time::Duration) -> Self {
        self.http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to create HTTP client");
        self
    }

    /// Build the endpoint URL for the configured model.
    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }
}

fn convert_message(msg: &ChatMessage) -> GeminiContent {
    let role = match msg.role {
        Role::Assistant => "model",
        // Gemini has no system role in contents; system messages are
        // lifted into systemInstruction by build_request.
        Role::System | Role::User => "user",
    };

    GeminiContent {
        role: Some(role.to_string()),
        parts: vec![GeminiPart {
            text: msg.content.clone(),
        }],
    }
}

pub(crate) fn build_request(transcript: &Transcript, temperature: f64) -> GeminiRequest {
    let system_instruction = transcript
        .messages()
        .iter()
        .find(|m| m.role == Role::System)
        .map(|m| GeminiContent {
            role: None,
            parts: vec![GeminiPart {
                text: m.content.clone(),
            }],
        });

    let contents: Vec<GeminiContent> = transcript
        .messages()
        .iter()
        .filter(|m| m.role != Role::System)
        .map(convert_message)
        .collect();

    GeminiRequest {
        contents,
        system_instruction,
        generation_config: Some(GeminiGenerationConfig {
            temperature: Some(temperature),
        }),
    }
}

pub(crate) fn convert_response(resp: GeminiResponse) -> Completion {
    let text = resp
        .candidates
        .into_iter()
        .next()
        .map(|c| {
            c.content
                .parts
                .into_iter()
                .map(|p| p.text)
                .collect::<Vec<_>>()
                .join("")
        })
        .unwrap_or_default();

    let usage = resp
        .usage_metadata
        .map(|u| Usage {
            input_tokens: u.prompt_token_count,
            output_tokens: u.candidates_token_count,
        })
        .unwrap_or_default();

    Completion {
        text: text.trim().to_string(),
        usage,
    }
}

#[async_trait]
impl super::client::CompletionClient for GeminiClient {
    async fn complete(&self, transcript: &Transcript) -> Result<Completion, LlmError> {
        let gemini_req = build_request(transcript, self.temperature);
        let url = format!("{}?key={}", self.endpoint(), self.api_key);

        let response = self
            .http
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&gemini_req)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error: GeminiError = response.json().await?;
            return Err(LlmError::Api {
                status: status.as_u16(),
                message: error.error.message,
            });
        }

        let gemini_resp: GeminiResponse = response.json().await?;
        Ok(convert_response(gemini_resp))
    }
}
