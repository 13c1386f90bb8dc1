//! Tests for the health probe and the embedded records browser.

mod common;

use axum::http::{header, StatusCode};
use extractly::testing::MockAI;

use common::{body_json, TestApp};

#[tokio::test]
async fn health_reports_the_store_status() {
    let app = TestApp::new(MockAI::default());

    let response = app.get("/health").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "extractly-backend");
    assert_eq!(body["database"]["status"], "ok");
    assert!(body["timestamp"].as_str().is_some());
}

#[tokio::test]
async fn root_serves_the_records_browser() {
    let app = TestApp::new(MockAI::default());

    let response = app.get("/").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response
        .headers()
        .get(header::CONTENT_TYPE)
        .unwrap()
        .to_str()
        .unwrap()
        .starts_with("text/html"));

    let response = app.get("/app.js").await;
    assert_eq!(response.status(), StatusCode::OK);
    let mime = response
        .headers()
        .get(header::CONTENT_TYPE)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(mime.contains("javascript"), "unexpected mime: {mime}");
}

#[tokio::test]
async fn unknown_paths_fall_back_to_the_browser_shell() {
    let app = TestApp::new(MockAI::default());

    let response = app.get("/records/some-client-route").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response
        .headers()
        .get(header::CONTENT_TYPE)
        .unwrap()
        .to_str()
        .unwrap()
        .starts_with("text/html"));
}
