//! Threadline application composition root
//!
//! Builds the store, completion provider and media storage from the
//! environment and mounts the Conversations routes next to the
//! infrastructure routes.

use std::sync::Arc;

use axum::{extract::DefaultBodyLimit, http::HeaderValue, Router};
use threadline_common::Config;
use threadline_conversations::{ConversationStore, ConversationStoreFactory, ConversationsState};
use threadline_llm::{LlmConfig, LlmService, LlmServiceFactory};
use threadline_media::{MediaConfig, MediaStorage, MediaStorageFactory};
use tower_http::cors::{Any, CorsLayer};

/// Maximum accepted request body, sized for attachment uploads
pub const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Create the main application router from already-built collaborators
pub fn create_app(
    store: Arc<dyn ConversationStore>,
    llm: Arc<dyn LlmService>,
    media: Arc<dyn MediaStorage>,
) -> Router {
    let conversations_state = ConversationsState::new(store, llm, media);

    Router::new()
        .route("/health", axum::routing::get(health_check))
        .route(
            "/",
            axum::routing::get(|| async { "Threadline API v0.0.1-SNAPSHOT" }),
        )
        .merge(threadline_conversations::routes().with_state(conversations_state))
}

/// Build every collaborator from configuration and the environment
pub async fn create_app_from_config(config: &Config) -> Result<Router, anyhow::Error> {
    let store = ConversationStoreFactory::create(config).await?;

    let llm_config = LlmConfig::from_env()?;
    let llm: Arc<dyn LlmService> = Arc::from(LlmServiceFactory::create(llm_config)?);

    let media_config = MediaConfig::from_env()?;
    let media: Arc<dyn MediaStorage> = Arc::from(MediaStorageFactory::create(media_config)?);

    Ok(create_app(store, llm, media))
}

/// CORS layer from a comma-separated origin list; `*` allows any origin
pub fn build_cors_layer(origins: &str) -> CorsLayer {
    let base = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if origins.split(',').any(|o| o.trim() == "*") {
        return base.allow_origin(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %o, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    base.allow_origin(allowed)
}

/// Request body limit layer
pub fn body_limit_layer() -> DefaultBodyLimit {
    DefaultBodyLimit::max(MAX_BODY_BYTES)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
