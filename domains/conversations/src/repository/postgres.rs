//! Postgres conversation store
//!
//! One row per conversation; the transcript lives in a JSONB array so an
//! append is a single `INSERT ... ON CONFLICT DO UPDATE` statement.

use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::PgPool;
use threadline_common::RepositoryError;

use super::ConversationStore;
use crate::domain::entities::{derive_title, Conversation, ConversationSummary, MessageContext};

#[derive(sqlx::FromRow)]
struct ConversationRow {
    conversation_id: String,
    title: Option<String>,
    model: String,
    messages: Json<Vec<MessageContext>>,
    created_at: DateTime<Utc>,
}

impl From<ConversationRow> for Conversation {
    fn from(row: ConversationRow) -> Self {
        Conversation {
            conversation_id: row.conversation_id,
            title: row.title,
            model: row.model,
            messages: row.messages.0,
            created_at: row.created_at,
        }
    }
}

/// Stored rows that no longer decode into a transcript are data errors,
/// everything else stays a connection error
fn read_error(err: sqlx::Error) -> RepositoryError {
    match err {
        sqlx::Error::ColumnDecode { index, source } => {
            RepositoryError::InvalidData(format!("Failed to decode column {}: {}", index, source))
        }
        other => RepositoryError::Connection(other),
    }
}

#[derive(Clone)]
pub struct PgConversationStore {
    pool: PgPool,
}

impl PgConversationStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Apply pending migrations
    pub async fn migrate(&self) -> Result<(), RepositoryError> {
        sqlx::migrate!("../../migrations")
            .run(&self.pool)
            .await
            .map_err(|e| RepositoryError::Unavailable(format!("Migration failed: {}", e)))
    }

    /// Get a reference to the underlying pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait::async_trait]
impl ConversationStore for PgConversationStore {
    async fn append(
        &self,
        conversation_id: &str,
        messages: &[MessageContext],
        model: &str,
    ) -> Result<(), RepositoryError> {
        // model, title and created_at only come from the insert arm
        sqlx::query(
            r#"
            INSERT INTO conversations (conversation_id, title, model, messages, created_at)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (conversation_id) DO UPDATE SET
                messages = conversations.messages || EXCLUDED.messages
            "#,
        )
        .bind(conversation_id)
        .bind(derive_title(messages))
        .bind(model)
        .bind(Json(messages))
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get(&self, conversation_id: &str) -> Result<Conversation, RepositoryError> {
        let row = sqlx::query_as::<_, ConversationRow>(
            r#"
            SELECT conversation_id, title, model, messages, created_at
            FROM conversations
            WHERE conversation_id = $1
            "#,
        )
        .bind(conversation_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(read_error)?;

        row.map(Into::into).ok_or(RepositoryError::NotFound)
    }

    async fn list(&self) -> Result<Vec<ConversationSummary>, RepositoryError> {
        let rows = sqlx::query_as::<_, (String, DateTime<Utc>, Option<String>)>(
            r#"
            SELECT conversation_id, created_at, title
            FROM conversations
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(read_error)?;

        Ok(rows
            .into_iter()
            .map(|(conversation_id, created_at, title)| ConversationSummary {
                conversation_id,
                created_at,
                title,
            })
            .collect())
    }
}
