//! Common test utilities for integration tests
//!
//! - An in-process app wired to the in-memory store and mock providers
//! - Request builders and body parsing
//! - Optional Postgres pool for store tests

use std::env;
use std::sync::{Arc, Once};

use anyhow::Result;
use axum::{
    body::Body,
    http::{Method, Request},
    Router,
};
use serde_json::Value;
use sqlx::PgPool;
use threadline_conversations::MemoryConversationStore;
use threadline_llm::mock::MockLlmService;
use threadline_media::mock::MockMediaStorage;

static INIT: Once = Once::new();

pub const DEFAULT_TEST_MODEL: &str = "gemini-1.5-flash";
pub const MULTIPART_BOUNDARY: &str = "threadline-test-boundary";

/// Test application with handles on every collaborator
pub struct TestApp {
    pub store: Arc<MemoryConversationStore>,
    pub llm: MockLlmService,
    pub media: MockMediaStorage,
}

impl TestApp {
    pub fn new() -> Self {
        Self {
            store: Arc::new(MemoryConversationStore::new()),
            llm: MockLlmService::with_default_model(DEFAULT_TEST_MODEL),
            media: MockMediaStorage::new(),
        }
    }

    /// Fresh router sharing this app's collaborators
    pub fn router(&self) -> Router {
        threadline_app::create_app(
            self.store.clone(),
            Arc::new(self.llm.clone()),
            Arc::new(self.media.clone()),
        )
    }
}

/// Build a JSON request
pub fn json_request(method: Method, uri: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder().method(method).uri(uri);

    if let Some(b) = body {
        builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&b).unwrap()))
            .unwrap()
    } else {
        builder.body(Body::empty()).unwrap()
    }
}

/// Build a multipart request with a single file field
pub fn multipart_request(field: &str, filename: &str, bytes: &[u8]) -> Request<Body> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", MULTIPART_BOUNDARY).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
            field, filename
        )
        .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: image/png\r\n\r\n");
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{}--\r\n", MULTIPART_BOUNDARY).as_bytes());

    Request::builder()
        .method(Method::POST)
        .uri("/upload")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={}", MULTIPART_BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

/// Parse response body as JSON Value
pub async fn parse_body(response: axum::http::Response<Body>) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

/// Connect to the test database, or `None` when none is configured
pub async fn test_pool() -> Result<Option<PgPool>> {
    INIT.call_once(|| {
        dotenvy::from_filename(".env.test").ok();
    });

    let Ok(database_url) = env::var("TEST_DATABASE_URL") else {
        return Ok(None);
    };

    let pool = PgPool::connect(&database_url).await?;
    sqlx::migrate!("../../migrations").run(&pool).await?;
    Ok(Some(pool))
}
