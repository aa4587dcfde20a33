//! In-memory conversation store
//!
//! Same contract as the Postgres store: each append runs under one write
//! lock, so create-or-append is atomic per call. Listing follows insertion
//! order.

use std::collections::HashMap;
use std::sync::RwLock;

use threadline_common::RepositoryError;

use super::ConversationStore;
use crate::domain::entities::{Conversation, ConversationSummary, MessageContext};

#[derive(Debug, Default)]
struct Inner {
    conversations: HashMap<String, Conversation>,
    order: Vec<String>,
}

#[derive(Debug, Default)]
pub struct MemoryConversationStore {
    inner: RwLock<Inner>,
}

impl MemoryConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored conversations. Still counts after a poisoned lock.
    pub fn len(&self) -> usize {
        let inner = self.inner.read().unwrap_or_else(|poisoned| {
            tracing::warn!("Conversation store lock poisoned; reading through it");
            poisoned.into_inner()
        });
        inner.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned<T>(_: T) -> RepositoryError {
    RepositoryError::Unavailable("conversation store lock poisoned".to_string())
}

#[async_trait::async_trait]
impl ConversationStore for MemoryConversationStore {
    async fn append(
        &self,
        conversation_id: &str,
        messages: &[MessageContext],
        model: &str,
    ) -> Result<(), RepositoryError> {
        let mut inner = self.inner.write().map_err(poisoned)?;

        if let Some(existing) = inner.conversations.get_mut(conversation_id) {
            existing.messages.extend_from_slice(messages);
            return Ok(());
        }

        inner.conversations.insert(
            conversation_id.to_string(),
            Conversation::first_write(conversation_id, messages, model),
        );
        inner.order.push(conversation_id.to_string());
        Ok(())
    }

    async fn get(&self, conversation_id: &str) -> Result<Conversation, RepositoryError> {
        let inner = self.inner.read().map_err(poisoned)?;
        inner
            .conversations
            .get(conversation_id)
            .cloned()
            .ok_or(RepositoryError::NotFound)
    }

    async fn list(&self) -> Result<Vec<ConversationSummary>, RepositoryError> {
        let inner = self.inner.read().map_err(poisoned)?;
        Ok(inner
            .order
            .iter()
            .filter_map(|id| inner.conversations.get(id))
            .map(Conversation::summary)
            .collect())
    }
}
