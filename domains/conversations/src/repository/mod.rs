//! Conversation persistence for the Conversations domain
//!
//! [`ConversationStore`] is the only persistence seam the chat pipeline
//! sees. `append` must be a single atomic create-or-append against the
//! backing store; callers never read-modify-write.

pub mod memory;
pub mod postgres;

use std::sync::Arc;

use threadline_common::{Config, RepositoryError, StoreProvider};

use crate::domain::entities::{Conversation, ConversationSummary, MessageContext};

pub use memory::MemoryConversationStore;
pub use postgres::PgConversationStore;

#[async_trait::async_trait]
pub trait ConversationStore: Send + Sync {
    /// Append `messages` to the end of the conversation, creating it first
    /// (with `model`, a derived title and `created_at = now`) if absent.
    /// An existing conversation keeps its original model.
    async fn append(
        &self,
        conversation_id: &str,
        messages: &[MessageContext],
        model: &str,
    ) -> Result<(), RepositoryError>;

    /// Fetch a conversation; `RepositoryError::NotFound` if absent
    async fn get(&self, conversation_id: &str) -> Result<Conversation, RepositoryError>;

    /// Summaries of all conversations in store-default order
    async fn list(&self) -> Result<Vec<ConversationSummary>, RepositoryError>;
}

/// Factory for creating ConversationStore implementations
pub struct ConversationStoreFactory;

impl ConversationStoreFactory {
    /// Create the configured store, connecting and migrating Postgres if selected
    pub async fn create(config: &Config) -> Result<Arc<dyn ConversationStore>, RepositoryError> {
        match config.store_provider {
            StoreProvider::Postgres => {
                let database_url = config.database_url.as_deref().ok_or_else(|| {
                    RepositoryError::Unavailable(
                        "DATABASE_URL is required for the postgres store".to_string(),
                    )
                })?;

                tracing::info!("Creating Postgres conversation store");
                let pool = sqlx::PgPool::connect(database_url).await?;
                let store = PgConversationStore::new(pool);
                store.migrate().await?;
                Ok(Arc::new(store))
            }
            StoreProvider::Memory => {
                tracing::info!("Creating in-memory conversation store");
                Ok(Arc::new(MemoryConversationStore::new()))
            }
        }
    }
}
