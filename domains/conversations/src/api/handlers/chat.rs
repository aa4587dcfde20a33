//! Chat API handler
//!
//! - POST /chat - Complete a message against its prior turns and persist the exchange

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use threadline_common::{Result, ValidatedJson};
use validator::Validate;

use crate::api::middleware::ConversationsState;
use crate::domain::context::RawTurn;
use crate::pipeline::ChatInput;

/// Request for a chat exchange
#[derive(Debug, Deserialize, Validate)]
pub struct ChatRequest {
    #[validate(length(min = 1, max = 200))]
    pub conversation_id: String,

    /// New user message, forwarded verbatim (may be empty)
    #[serde(default)]
    pub message: String,

    /// Requested model; empty selects the provider default
    #[serde(default)]
    #[validate(length(max = 100))]
    pub model: String,

    /// Opaque attachment reference, usually a URL returned by POST /upload
    #[serde(default)]
    pub image_url: Option<String>,

    /// Prior turns supplied by the client
    #[serde(default)]
    pub context: Vec<RawTurn>,
}

impl From<ChatRequest> for ChatInput {
    fn from(req: ChatRequest) -> Self {
        Self {
            conversation_id: req.conversation_id,
            message: req.message,
            model: req.model,
            attachment: req.image_url,
            prior_turns: req.context,
        }
    }
}

/// Response for a chat exchange
#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub ai_response: String,
}

/// Run one chat exchange
pub async fn chat(
    State(state): State<ConversationsState>,
    ValidatedJson(req): ValidatedJson<ChatRequest>,
) -> Result<Json<ChatResponse>> {
    let ai_response = state.pipeline.handle(req.into()).await?;
    Ok(Json(ChatResponse { ai_response }))
}
