//! Chat endpoint integration tests

use axum::http::{Method, StatusCode};
use serde_json::json;
use threadline_conversations::{ConversationStore, MessageRole};
use threadline_llm::mock::MockReply;
use threadline_llm::{LlmMessage, LlmRole};
use tower::ServiceExt;

use crate::common::{json_request, parse_body, TestApp, DEFAULT_TEST_MODEL};

mod test_chat_success {
    use super::*;

    #[tokio::test]
    async fn test_first_exchange_creates_conversation() {
        let app = TestApp::new();
        app.llm.set_reply(MockReply::Text("Hello!".to_string()));

        let req = json_request(
            Method::POST,
            "/chat",
            Some(json!({"conversation_id": "c1", "message": "Hi", "model": ""})),
        );
        let resp = app.router().oneshot(req).await.unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(parse_body(resp).await, json!({"ai_response": "Hello!"}));

        let conv = app.store.get("c1").await.unwrap();
        assert_eq!(conv.model, DEFAULT_TEST_MODEL);
        assert_eq!(conv.messages.len(), 2);
        assert_eq!(conv.messages[0].role(), MessageRole::User);
        assert_eq!(conv.messages[0].text(), "Hi");
        assert_eq!(conv.messages[1].role(), MessageRole::Assistant);
        assert_eq!(conv.messages[1].text(), "Hello!");
    }

    #[tokio::test]
    async fn test_context_is_filtered_and_forwarded() {
        let app = TestApp::new();

        let req = json_request(
            Method::POST,
            "/chat",
            Some(json!({
                "conversation_id": "c1",
                "message": "hello",
                "context": [
                    {"is_user": true, "text": ""},
                    {"is_user": false, "text": "hi"},
                    {"is_user": true}
                ]
            })),
        );
        let resp = app.router().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let requests = app.llm.recorded_requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(
            requests[0].messages,
            vec![LlmMessage::assistant("hi"), LlmMessage::user("hello")]
        );
        assert_eq!(requests[0].messages[1].role, LlmRole::User);
    }

    #[tokio::test]
    async fn test_second_exchange_appends_and_keeps_model() {
        let app = TestApp::new();

        for (message, model) in [("one", "first-model"), ("two", "second-model")] {
            let req = json_request(
                Method::POST,
                "/chat",
                Some(json!({"conversation_id": "c1", "message": message, "model": model})),
            );
            let resp = app.router().oneshot(req).await.unwrap();
            assert_eq!(resp.status(), StatusCode::OK);
        }

        let conv = app.store.get("c1").await.unwrap();
        assert_eq!(conv.model, "first-model");
        assert_eq!(conv.messages.len(), 4);
        assert_eq!(conv.messages[2].text(), "two");
        assert_eq!(app.llm.recorded_requests()[1].model, "second-model");
    }

    #[tokio::test]
    async fn test_image_url_is_stored_on_user_turn() {
        let app = TestApp::new();

        let req = json_request(
            Method::POST,
            "/chat",
            Some(json!({
                "conversation_id": "c1",
                "message": "what is this?",
                "image_url": "mock://uploads/abc/cat.png"
            })),
        );
        let resp = app.router().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let conv = app.store.get("c1").await.unwrap();
        assert_eq!(
            conv.messages[0].attachment(),
            Some("mock://uploads/abc/cat.png")
        );
    }
}

mod test_chat_errors {
    use super::*;

    #[tokio::test]
    async fn test_missing_conversation_id_returns_400() {
        let app = TestApp::new();

        let req = json_request(Method::POST, "/chat", Some(json!({"message": "Hi"})));
        let resp = app.router().oneshot(req).await.unwrap();

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body = parse_body(resp).await;
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert_eq!(app.llm.call_count(), 0);
    }

    #[tokio::test]
    async fn test_blank_conversation_id_returns_400() {
        let app = TestApp::new();

        let req = json_request(
            Method::POST,
            "/chat",
            Some(json!({"conversation_id": "   ", "message": "Hi"})),
        );
        let resp = app.router().oneshot(req).await.unwrap();

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(app.llm.call_count(), 0);
    }

    #[tokio::test]
    async fn test_malformed_json_returns_400() {
        let app = TestApp::new();

        let req = axum::http::Request::builder()
            .method(Method::POST)
            .uri("/chat")
            .header("content-type", "application/json")
            .body(axum::body::Body::from("{not json"))
            .unwrap();
        let resp = app.router().oneshot(req).await.unwrap();

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_context_entry_without_is_user_returns_400() {
        let app = TestApp::new();

        let req = json_request(
            Method::POST,
            "/chat",
            Some(json!({
                "conversation_id": "c1",
                "message": "Hi",
                "context": [{"text": "orphan"}]
            })),
        );
        let resp = app.router().oneshot(req).await.unwrap();

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_provider_failure_returns_502_and_persists_nothing() {
        let app = TestApp::new();
        app.llm.set_reply(MockReply::ProviderError {
            status: 429,
            body: "{\"error\":{\"status\":\"RESOURCE_EXHAUSTED\"}}".to_string(),
        });

        let req = json_request(
            Method::POST,
            "/chat",
            Some(json!({"conversation_id": "c1", "message": "Hi"})),
        );
        let resp = app.router().oneshot(req).await.unwrap();

        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
        let body = parse_body(resp).await;
        assert_eq!(body["error"]["code"], "COMPLETION_FAILED");
        assert!(app.store.is_empty());
    }

    #[tokio::test]
    async fn test_empty_completion_returns_502() {
        let app = TestApp::new();
        app.llm.set_reply(MockReply::Empty);

        let req = json_request(
            Method::POST,
            "/chat",
            Some(json!({"conversation_id": "c1", "message": "Hi"})),
        );
        let resp = app.router().oneshot(req).await.unwrap();

        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
        assert!(app.store.is_empty());
    }
}
