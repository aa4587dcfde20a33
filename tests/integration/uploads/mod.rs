//! Upload endpoint integration tests

use axum::http::StatusCode;
use tower::ServiceExt;

use crate::common::{multipart_request, parse_body, TestApp};

#[tokio::test]
async fn test_upload_returns_url() {
    let app = TestApp::new();

    let resp = app
        .router()
        .oneshot(multipart_request("file", "cat.png", b"\x89PNG fake bytes"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = parse_body(resp).await;
    let url = body["url"].as_str().unwrap();
    assert!(url.starts_with("mock://uploads/"));
    assert!(url.ends_with("/cat.png"));

    let uploads = app.media.uploads();
    assert_eq!(uploads.len(), 1);
    assert_eq!(uploads[0].url, url);
}

#[tokio::test]
async fn test_upload_without_file_field_returns_400() {
    let app = TestApp::new();

    let resp = app
        .router()
        .oneshot(multipart_request("attachment", "cat.png", b"bytes"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = parse_body(resp).await;
    assert_eq!(body["error"]["message"], "Validation error: No file uploaded");
    assert!(app.media.uploads().is_empty());
}

#[tokio::test]
async fn test_upload_empty_file_returns_400() {
    let app = TestApp::new();

    let resp = app
        .router()
        .oneshot(multipart_request("file", "empty.png", b""))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}
