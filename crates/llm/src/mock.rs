//! Mock LLM Service Implementation
//!
//! Programmable mock used by `LlmServiceFactory` when provider is `"mock"`
//! and by tests:
//! - `MockReply` selects what the next completions return
//! - every request is recorded for assertions

use std::sync::{Arc, Mutex, RwLock};

use crate::{CompletionRequest, CompletionResponse, LlmError, LlmService};

/// What the mock answers with
#[derive(Debug, Clone, Default, PartialEq)]
pub enum MockReply {
    /// "Mock response to: {last message}"
    #[default]
    Echo,
    /// A fixed completion text
    Text(String),
    /// Fail with `LlmError::EmptyCompletion`
    Empty,
    /// Fail with `LlmError::Provider`
    ProviderError { status: u16, body: String },
    /// Fail with `LlmError::Transport`
    TransportError(String),
}

/// Mock LLM service for testing
#[derive(Debug, Clone)]
pub struct MockLlmService {
    reply: Arc<RwLock<MockReply>>,
    history: Arc<Mutex<Vec<CompletionRequest>>>,
    default_model: String,
}

impl MockLlmService {
    /// Create a new mock LLM service
    pub fn new() -> Self {
        Self::with_default_model("mock-model")
    }

    /// Create a mock that reports `default_model` for requests without a model
    pub fn with_default_model(default_model: impl Into<String>) -> Self {
        Self {
            reply: Arc::new(RwLock::new(MockReply::default())),
            history: Arc::new(Mutex::new(Vec::new())),
            default_model: default_model.into(),
        }
    }

    /// Create a mock that always answers with `text`
    pub fn replying(text: impl Into<String>) -> Self {
        let service = Self::new();
        service.set_reply(MockReply::Text(text.into()));
        service
    }

    /// Configure the reply for subsequent completions
    pub fn set_reply(&self, reply: MockReply) {
        *self.reply.write().unwrap() = reply;
    }

    /// Get recorded completion requests
    pub fn recorded_requests(&self) -> Vec<CompletionRequest> {
        self.history.lock().unwrap().clone()
    }

    /// Number of completions attempted
    pub fn call_count(&self) -> usize {
        self.history.lock().unwrap().len()
    }
}

impl Default for MockLlmService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl LlmService for MockLlmService {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        tracing::info!(
            turns = request.messages.len(),
            "Mock LLM service processing completion request"
        );

        let model = self.resolve_model(&request.model);
        let reply = self.reply.read().unwrap().clone();

        let content = match reply {
            MockReply::Echo => {
                let last_message = request
                    .messages
                    .last()
                    .map(|m| m.content.as_str())
                    .unwrap_or("empty");
                format!("Mock response to: {}", last_message)
            }
            MockReply::Text(text) => text,
            MockReply::Empty => {
                self.history.lock().unwrap().push(request);
                return Err(LlmError::EmptyCompletion);
            }
            MockReply::ProviderError { status, body } => {
                self.history.lock().unwrap().push(request);
                return Err(LlmError::Provider { status, body });
            }
            MockReply::TransportError(message) => {
                self.history.lock().unwrap().push(request);
                return Err(LlmError::Transport(message));
            }
        };

        self.history.lock().unwrap().push(request);

        Ok(CompletionResponse { content, model })
    }

    fn default_model(&self) -> &str {
        &self.default_model
    }
}
