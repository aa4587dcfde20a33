//! Domain entities for Conversations domain
//!
//! A conversation is an append-only transcript of [`MessageContext`] turns
//! keyed by a caller-supplied id. Its `model`, `title` and `created_at` are
//! fixed by the first write and never change afterwards.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum conversation id length
pub const MAX_CONVERSATION_ID_LENGTH: usize = 200;

/// Maximum model string length
pub const MAX_MODEL_LENGTH: usize = 100;

/// Derived titles are cut to this many characters
const MAX_TITLE_CHARS: usize = 60;

/// Message role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

impl std::fmt::Display for MessageRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MessageRole::User => write!(f, "user"),
            MessageRole::Assistant => write!(f, "assistant"),
        }
    }
}

/// One turn of a conversation. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageContext {
    role: MessageRole,
    text: String,
    #[serde(rename = "image_url", default, skip_serializing_if = "Option::is_none")]
    attachment: Option<String>,
    timestamp: DateTime<Utc>,
}

impl MessageContext {
    /// A user turn stamped now. Blank attachment references are dropped.
    pub fn user(text: impl Into<String>, attachment: Option<String>) -> Self {
        Self {
            role: MessageRole::User,
            text: text.into(),
            attachment: attachment.filter(|a| !a.trim().is_empty()),
            timestamp: Utc::now(),
        }
    }

    /// An assistant turn stamped now
    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            text: text.into(),
            attachment: None,
            timestamp: Utc::now(),
        }
    }

    /// An assistant turn answering `prompt`, never stamped before it
    pub fn reply_to(prompt: &MessageContext, text: impl Into<String>) -> Self {
        let mut reply = Self::assistant(text);
        reply.timestamp = reply.timestamp.max(prompt.timestamp);
        reply
    }

    pub fn role(&self) -> MessageRole {
        self.role
    }

    pub fn is_user(&self) -> bool {
        self.role == MessageRole::User
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn attachment(&self) -> Option<&str> {
        self.attachment.as_deref()
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

/// Conversation aggregate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    pub conversation_id: String,
    pub title: Option<String>,
    pub model: String,
    pub messages: Vec<MessageContext>,
    pub created_at: DateTime<Utc>,
}

impl Conversation {
    /// Build the record created by the first append for `conversation_id`
    pub fn first_write(conversation_id: &str, messages: &[MessageContext], model: &str) -> Self {
        Conversation {
            conversation_id: conversation_id.to_string(),
            title: derive_title(messages),
            model: model.to_string(),
            messages: messages.to_vec(),
            created_at: Utc::now(),
        }
    }

    pub fn summary(&self) -> ConversationSummary {
        ConversationSummary {
            conversation_id: self.conversation_id.clone(),
            created_at: self.created_at,
            title: self.title.clone(),
        }
    }
}

/// Listing projection of a conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationSummary {
    pub conversation_id: String,
    pub created_at: DateTime<Utc>,
    pub title: Option<String>,
}

/// Title taken from the first user turn with text: whitespace collapsed,
/// cut to 60 characters with a trailing ellipsis.
pub fn derive_title(messages: &[MessageContext]) -> Option<String> {
    let text = messages
        .iter()
        .filter(|m| m.is_user())
        .map(|m| m.text().split_whitespace().collect::<Vec<_>>().join(" "))
        .find(|t| !t.is_empty())?;

    if text.chars().count() <= MAX_TITLE_CHARS {
        return Some(text);
    }

    let mut title: String = text.chars().take(MAX_TITLE_CHARS).collect();
    title.push('…');
    Some(title)
}
