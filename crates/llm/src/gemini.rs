//! Google Gemini API Implementation
//!
//! Calls the Gemini `generateContent` endpoint
//! (https://generativelanguage.googleapis.com/v1beta/models/{model}:generateContent)
//! using reqwest HTTP client.

use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};

use crate::{CompletionRequest, CompletionResponse, LlmConfig, LlmError, LlmRole, LlmService};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const API_VERSION: &str = "v1beta";

/// generateContent request body
#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    /// Reasoning parts are not part of the answer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    thought: Option<bool>,
}

/// generateContent response body
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    model_version: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<Content>,
    finish_reason: Option<String>,
}

/// Gemini's role vocabulary calls the assistant "model"
fn wire_role(role: LlmRole) -> &'static str {
    match role {
        LlmRole::User => "user",
        LlmRole::Assistant => "model",
    }
}

/// Pull the answer text out of the first candidate.
///
/// Succeeds only if there is a candidate carrying at least one non-empty,
/// non-reasoning text part.
fn extract_text(response: GenerateContentResponse) -> Result<String, LlmError> {
    let candidate = response
        .candidates
        .into_iter()
        .next()
        .ok_or(LlmError::EmptyCompletion)?;

    let parts = candidate.content.map(|c| c.parts).unwrap_or_default();
    let text = parts
        .into_iter()
        .filter(|part| part.thought != Some(true))
        .filter_map(|part| part.text)
        .collect::<Vec<_>>()
        .join("");

    if text.is_empty() {
        tracing::warn!(
            finish_reason = ?candidate.finish_reason,
            "Gemini candidate contained no text"
        );
        return Err(LlmError::EmptyCompletion);
    }

    Ok(text)
}

/// Gemini LLM service implementation
pub struct GeminiService {
    client: Client,
    config: LlmConfig,
    base_url: String,
}

impl GeminiService {
    /// Create a new Gemini service
    pub fn new(config: LlmConfig) -> Self {
        let base_url = config
            .base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        Self {
            client: Client::new(),
            config,
            base_url,
        }
    }

    /// `{base}/v1beta/models/{model}:generateContent` with the model kept
    /// inside a single percent-encoded path segment
    fn endpoint(&self, model: &str) -> Result<Url, LlmError> {
        let mut url = Url::parse(&self.base_url).map_err(|e| {
            LlmError::Configuration(format!("Invalid Gemini base URL {}: {}", self.base_url, e))
        })?;

        url.path_segments_mut()
            .map_err(|_| {
                LlmError::Configuration(format!(
                    "Gemini base URL cannot carry a path: {}",
                    self.base_url
                ))
            })?
            .pop_if_empty()
            .push(API_VERSION)
            .push("models")
            .push(&format!("{}:generateContent", model));

        Ok(url)
    }
}

#[async_trait::async_trait]
impl LlmService for GeminiService {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let model = self.resolve_model(&request.model);

        let contents: Vec<Content> = request
            .messages
            .iter()
            .map(|m| Content {
                role: Some(wire_role(m.role).to_string()),
                parts: vec![Part {
                    text: Some(m.content.clone()),
                    thought: None,
                }],
            })
            .collect();

        let body = GenerateContentRequest { contents };
        let url = self.endpoint(&model)?;

        tracing::debug!(
            model = %model,
            turns = request.messages.len(),
            "Sending Gemini API request"
        );

        let response = self
            .client
            .post(url)
            .header("x-goog-api-key", &self.config.api_key)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::Transport(format!("HTTP request failed: {}", e)))?;

        let status = response.status();

        if !status.is_success() {
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error body".to_string());

            return Err(LlmError::Provider {
                status: status.as_u16(),
                body: error_body,
            });
        }

        let api_response: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| LlmError::Transport(format!("Failed to parse response: {}", e)))?;

        let model_version = api_response.model_version.clone();
        let content = extract_text(api_response)?;

        Ok(CompletionResponse {
            content,
            model: model_version.unwrap_or(model),
        })
    }

    fn default_model(&self) -> &str {
        &self.config.default_model
    }
}
