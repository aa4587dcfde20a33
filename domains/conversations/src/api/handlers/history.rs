//! Conversation history API handlers
//!
//! - GET /history - List conversation summaries
//! - GET /history/{conversation_id} - Get one conversation with its transcript

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use threadline_common::{Error, RepositoryError, Result};

use crate::api::middleware::ConversationsState;
use crate::domain::entities::{Conversation, ConversationSummary, MessageContext, MessageRole};

/// Conversation summary DTO
#[derive(Debug, Serialize)]
pub struct ConversationSummaryResponse {
    pub conversation_id: String,
    pub created_at: DateTime<Utc>,
    pub title: Option<String>,
}

impl From<ConversationSummary> for ConversationSummaryResponse {
    fn from(s: ConversationSummary) -> Self {
        Self {
            conversation_id: s.conversation_id,
            created_at: s.created_at,
            title: s.title,
        }
    }
}

/// Message DTO
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub role: MessageRole,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl From<&MessageContext> for MessageResponse {
    fn from(m: &MessageContext) -> Self {
        Self {
            role: m.role(),
            text: m.text().to_string(),
            image_url: m.attachment().map(str::to_string),
            timestamp: m.timestamp(),
        }
    }
}

/// Conversation DTO
#[derive(Debug, Serialize)]
pub struct ConversationResponse {
    pub conversation_id: String,
    pub title: Option<String>,
    pub model: String,
    pub created_at: DateTime<Utc>,
    pub messages: Vec<MessageResponse>,
}

impl From<Conversation> for ConversationResponse {
    fn from(c: Conversation) -> Self {
        Self {
            messages: c.messages.iter().map(Into::into).collect(),
            conversation_id: c.conversation_id,
            title: c.title,
            model: c.model,
            created_at: c.created_at,
        }
    }
}

/// List all conversations
pub async fn list_history(
    State(state): State<ConversationsState>,
) -> Result<Json<Vec<ConversationSummaryResponse>>> {
    let summaries = state.store.list().await?;
    Ok(Json(summaries.into_iter().map(Into::into).collect()))
}

/// Get a single conversation by id
pub async fn get_history(
    State(state): State<ConversationsState>,
    Path(conversation_id): Path<String>,
) -> Result<Json<ConversationResponse>> {
    let conversation = state
        .store
        .get(&conversation_id)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => Error::NotFound("Conversation not found".to_string()),
            other => other.into(),
        })?;

    Ok(Json(conversation.into()))
}
