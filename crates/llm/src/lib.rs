//! Threadline LLM Service
//!
//! Provides text completion over an ordered sequence of chat turns:
//! - Google Gemini `generateContent` integration for production
//! - Programmable mock service for testing and development
//! - Configurable provider, API key, default model, and base URL
//!
//! Provider wire formats never leave their implementation module; callers
//! only see [`LlmMessage`], [`CompletionRequest`] and [`CompletionResponse`].

pub mod gemini;
pub mod mock;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Model used when neither the request nor the environment names one
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

#[derive(Error, Debug)]
pub enum LlmError {
    #[error("LLM configuration error: {0}")]
    Configuration(String),

    /// The provider answered successfully but produced no usable text
    #[error("Provider returned no completion text")]
    EmptyCompletion,

    /// The provider answered with a non-success status; `body` is the raw upstream payload
    #[error("Provider returned {status}: {body}")]
    Provider { status: u16, body: String },

    /// The request never produced a readable response
    #[error("Transport error: {0}")]
    Transport(String),
}

impl LlmError {
    /// Whether this failure originated upstream (as opposed to local misconfiguration)
    pub fn is_upstream(&self) -> bool {
        !matches!(self, LlmError::Configuration(_))
    }
}

/// Speaker of a turn, in provider-neutral vocabulary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LlmRole {
    User,
    Assistant,
}

/// One turn handed to the provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmMessage {
    pub role: LlmRole,
    pub content: String,
}

impl LlmMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: LlmRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: LlmRole::Assistant,
            content: content.into(),
        }
    }
}

/// Completion request: ordered turns plus the model to run them against.
/// An empty `model` selects the service's configured default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<LlmMessage>,
}

/// Successful completion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionResponse {
    pub content: String,
    pub model: String,
}

/// LLM service configuration
#[derive(Clone)]
pub struct LlmConfig {
    /// LLM provider (gemini, mock)
    pub provider: String,
    /// API key for the provider
    pub api_key: String,
    /// Model used when a request leaves `model` empty
    pub default_model: String,
    /// Override for the provider base URL
    pub base_url: Option<String>,
}

impl std::fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmConfig")
            .field("provider", &self.provider)
            .field("api_key", &"[REDACTED]")
            .field("default_model", &self.default_model)
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl LlmConfig {
    /// Create LLM config from environment variables
    pub fn from_env() -> Result<Self, LlmError> {
        dotenvy::dotenv().ok();

        let provider = std::env::var("LLM_PROVIDER").unwrap_or_else(|_| "gemini".to_string());
        let api_key = std::env::var("GEMINI_API_KEY").unwrap_or_default();
        let default_model = std::env::var("LLM_DEFAULT_MODEL")
            .ok()
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());
        let base_url = std::env::var("LLM_BASE_URL").ok().filter(|u| !u.is_empty());

        if provider == "gemini" && api_key.is_empty() {
            return Err(LlmError::Configuration(
                "GEMINI_API_KEY is required for the gemini provider".to_string(),
            ));
        }

        Ok(Self {
            provider,
            api_key,
            default_model,
            base_url,
        })
    }
}

/// Completion provider abstraction.
///
/// A single call is one upstream attempt: no retry, no backoff. Re-sending
/// the same turns may produce a different completion.
#[async_trait::async_trait]
pub trait LlmService: Send + Sync {
    /// Generate a completion for the given turns
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError>;

    /// Model used when a request does not name one
    fn default_model(&self) -> &str;

    /// Resolve the model a request will actually run against
    fn resolve_model(&self, requested: &str) -> String {
        if requested.is_empty() {
            self.default_model().to_string()
        } else {
            requested.to_string()
        }
    }
}

/// Factory for creating LlmService implementations
pub struct LlmServiceFactory;

impl LlmServiceFactory {
    /// Create an LlmService based on configuration
    pub fn create(config: LlmConfig) -> Result<Box<dyn LlmService>, LlmError> {
        match config.provider.as_str() {
            "gemini" => {
                tracing::info!(
                    default_model = %config.default_model,
                    "Creating Gemini LLM service"
                );
                if config.api_key.is_empty() {
                    return Err(LlmError::Configuration(
                        "GEMINI_API_KEY is required for the gemini provider".to_string(),
                    ));
                }
                Ok(Box::new(gemini::GeminiService::new(config)))
            }
            "mock" => {
                tracing::info!("Creating mock LLM service");
                Ok(Box::new(mock::MockLlmService::with_default_model(
                    config.default_model,
                )))
            }
            provider => Err(LlmError::Configuration(format!(
                "Unknown LLM provider: {}. Supported providers: gemini, mock",
                provider
            ))),
        }
    }
}
