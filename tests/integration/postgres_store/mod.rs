//! Postgres conversation store integration tests
//!
//! Run only when TEST_DATABASE_URL points at a database; otherwise each test
//! returns early.

use std::sync::Arc;

use threadline_common::RepositoryError;
use threadline_conversations::{ConversationStore, MessageContext, PgConversationStore};
use uuid::Uuid;

use crate::common::test_pool;

fn delta(user: &str, assistant: &str) -> Vec<MessageContext> {
    let prompt = MessageContext::user(user, None);
    let reply = MessageContext::reply_to(&prompt, assistant);
    vec![prompt, reply]
}

fn unique_id() -> String {
    format!("it-{}", Uuid::new_v4())
}

async fn store() -> Option<PgConversationStore> {
    test_pool().await.unwrap().map(PgConversationStore::new)
}

async fn cleanup(store: &PgConversationStore, conversation_id: &str) {
    sqlx::query("DELETE FROM conversations WHERE conversation_id = $1")
        .bind(conversation_id)
        .execute(store.pool())
        .await
        .unwrap();
}

#[tokio::test]
async fn test_append_creates_then_appends() {
    let Some(store) = store().await else {
        return;
    };
    let id = unique_id();
    let first = delta("Hi", "Hello!");
    let second = delta("More", "Sure.");

    store.append(&id, &first, "model-a").await.unwrap();
    let created = store.get(&id).await.unwrap();
    assert_eq!(created.messages, first);
    assert_eq!(created.model, "model-a");
    assert_eq!(created.title.as_deref(), Some("Hi"));

    store.append(&id, &second, "model-b").await.unwrap();
    let updated = store.get(&id).await.unwrap();
    assert_eq!(updated.model, "model-a");
    assert_eq!(updated.title.as_deref(), Some("Hi"));
    assert_eq!(updated.created_at, created.created_at);
    assert_eq!(updated.messages.len(), 4);
    assert_eq!(&updated.messages[2..], &second[..]);

    let listed = store.list().await.unwrap();
    assert!(listed.iter().any(|s| s.conversation_id == id));

    cleanup(&store, &id).await;
}

#[tokio::test]
async fn test_get_unknown_is_not_found() {
    let Some(store) = store().await else {
        return;
    };

    let result = store.get(&unique_id()).await;
    assert!(matches!(result, Err(RepositoryError::NotFound)));
}

#[tokio::test]
async fn test_concurrent_appends_keep_every_message() {
    let Some(store) = store().await else {
        return;
    };
    let store = Arc::new(store);
    let id = unique_id();

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let store = store.clone();
            let id = id.clone();
            tokio::spawn(async move {
                store
                    .append(&id, &delta(&format!("q{}", i), "a"), "m")
                    .await
                    .unwrap();
            })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap();
    }

    let conv = store.get(&id).await.unwrap();
    assert_eq!(conv.messages.len(), 16);

    cleanup(&store, &id).await;
}

#[tokio::test]
async fn test_undecodable_transcript_is_invalid_data() {
    let Some(store) = store().await else {
        return;
    };
    let id = unique_id();

    sqlx::query(
        "INSERT INTO conversations (conversation_id, model, messages) VALUES ($1, 'm', $2::jsonb)",
    )
    .bind(&id)
    .bind(r#"[{"bogus": 1}]"#)
    .execute(store.pool())
    .await
    .unwrap();

    let result = store.get(&id).await;
    assert!(matches!(result, Err(RepositoryError::InvalidData(_))));

    cleanup(&store, &id).await;
}
