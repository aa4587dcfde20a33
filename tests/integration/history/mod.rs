//! History endpoint integration tests

use axum::http::{Method, StatusCode};
use serde_json::json;
use tower::ServiceExt;

use crate::common::{json_request, parse_body, TestApp, DEFAULT_TEST_MODEL};

async fn chat(app: &TestApp, conversation_id: &str, message: &str) {
    let req = json_request(
        Method::POST,
        "/chat",
        Some(json!({"conversation_id": conversation_id, "message": message})),
    );
    let resp = app.router().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_get_history_returns_transcript() {
    let app = TestApp::new();
    app.llm
        .set_reply(threadline_llm::mock::MockReply::Text("Hello!".to_string()));
    chat(&app, "c1", "Hi").await;

    let resp = app
        .router()
        .oneshot(json_request(Method::GET, "/history/c1", None))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let body = parse_body(resp).await;
    assert_eq!(body["conversation_id"], "c1");
    assert_eq!(body["model"], DEFAULT_TEST_MODEL);
    assert_eq!(body["title"], "Hi");

    let messages = body["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0]["role"], "user");
    assert_eq!(messages[0]["text"], "Hi");
    assert_eq!(messages[1]["role"], "assistant");
    assert_eq!(messages[1]["text"], "Hello!");
    assert!(messages[0].get("image_url").is_none());
}

#[tokio::test]
async fn test_get_unknown_history_returns_404() {
    let app = TestApp::new();

    let resp = app
        .router()
        .oneshot(json_request(Method::GET, "/history/unknown", None))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body = parse_body(resp).await;
    assert_eq!(body["error"]["code"], "NOT_FOUND");
    assert_eq!(body["error"]["message"], "Not found: Conversation not found");
}

#[tokio::test]
async fn test_list_history_returns_summaries() {
    let app = TestApp::new();
    chat(&app, "c1", "first question").await;
    chat(&app, "c2", "second question").await;
    chat(&app, "c1", "follow up").await;

    let resp = app
        .router()
        .oneshot(json_request(Method::GET, "/history", None))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let body = parse_body(resp).await;
    let summaries = body.as_array().unwrap();
    assert_eq!(summaries.len(), 2);

    let c1 = summaries
        .iter()
        .find(|s| s["conversation_id"] == "c1")
        .unwrap();
    assert_eq!(c1["title"], "first question");
    assert!(c1.get("created_at").is_some());
    assert!(c1.get("messages").is_none());
}

#[tokio::test]
async fn test_list_history_empty() {
    let app = TestApp::new();

    let resp = app
        .router()
        .oneshot(json_request(Method::GET, "/history", None))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(parse_body(resp).await, json!([]));
}

#[tokio::test]
async fn test_padded_conversation_id_is_its_own_conversation() {
    let app = TestApp::new();
    chat(&app, " c1", "padded").await;
    chat(&app, "c1", "plain").await;

    let resp = app
        .router()
        .oneshot(json_request(Method::GET, "/history/%20c1", None))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let body = parse_body(resp).await;
    assert_eq!(body["conversation_id"], " c1");
    assert_eq!(body["messages"][0]["text"], "padded");
    assert_eq!(body["messages"].as_array().unwrap().len(), 2);
}
