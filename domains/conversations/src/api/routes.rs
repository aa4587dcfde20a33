//! Route definitions for Conversations domain API

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{chat, history, uploads};
use super::middleware::ConversationsState;

/// Create chat routes
fn chat_routes() -> Router<ConversationsState> {
    Router::new().route("/chat", post(chat::chat))
}

/// Create history routes
fn history_routes() -> Router<ConversationsState> {
    Router::new()
        .route("/history", get(history::list_history))
        .route("/history/{conversation_id}", get(history::get_history))
}

/// Create upload routes
fn upload_routes() -> Router<ConversationsState> {
    Router::new().route("/upload", post(uploads::upload))
}

/// Create all Conversations domain API routes
pub fn routes() -> Router<ConversationsState> {
    Router::new()
        .merge(chat_routes())
        .merge(history_routes())
        .merge(upload_routes())
}
