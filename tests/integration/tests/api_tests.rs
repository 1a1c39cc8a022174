//! API Integration Tests
//!
//! These run against a real server on an ephemeral port but never reach
//! Telegram: they cover the surface that fails fast (health, validation,
//! session checks, error envelopes).
//!
//! Run with: cargo test -p integration-tests --test api_tests

use integration_tests::{assert_error_code, assert_json, assert_status, TestServer};
use reqwest::StatusCode;
use serde_json::json;

// ============================================================================
// Health Check Tests
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/health").await.expect("Request failed");
    let body: serde_json::Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "telebridge");
}

#[tokio::test]
async fn test_root() {
    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/").await.expect("Request failed");
    let body: serde_json::Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/api/nope").await.expect("Request failed");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ============================================================================
// Session Checks
// ============================================================================

#[tokio::test]
async fn test_me_without_session_id() {
    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/api/auth/me").await.expect("Request failed");
    assert_error_code(response, StatusCode::UNAUTHORIZED, "MISSING_SESSION_ID")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_me_with_unknown_session() {
    let server = TestServer::start().await.expect("Failed to start server");
    let response = server
        .get("/api/auth/me?session_id=no-such-session")
        .await
        .expect("Request failed");
    assert_error_code(response, StatusCode::UNAUTHORIZED, "SESSION_NOT_FOUND")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_dialogs_with_unknown_session() {
    let server = TestServer::start().await.expect("Failed to start server");
    let response = server
        .get("/api/chats/dialogs?session_id=no-such-session")
        .await
        .expect("Request failed");
    assert_error_code(response, StatusCode::UNAUTHORIZED, "SESSION_NOT_FOUND")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_sign_in_with_unknown_session() {
    let server = TestServer::start().await.expect("Failed to start server");
    let response = server
        .post(
            "/api/auth/sign-in",
            &json!({"session_id": "no-such-session", "code": "12345"}),
        )
        .await
        .expect("Request failed");
    assert_error_code(response, StatusCode::UNAUTHORIZED, "SESSION_NOT_FOUND")
        .await
        .unwrap();
}

// ============================================================================
// Validation
// ============================================================================

#[tokio::test]
async fn test_send_code_requires_phone() {
    let server = TestServer::start().await.expect("Failed to start server");
    let response = server
        .post("/api/auth/send-code", &json!({"phone": ""}))
        .await
        .expect("Request failed");
    assert_error_code(response, StatusCode::BAD_REQUEST, "VALIDATION_ERROR")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_dialogs_limit_is_bounded() {
    let server = TestServer::start().await.expect("Failed to start server");
    let response = server
        .get("/api/chats/dialogs?session_id=x&limit=0")
        .await
        .expect("Request failed");
    assert_error_code(response, StatusCode::BAD_REQUEST, "VALIDATION_ERROR")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_delete_requires_message_ids() {
    let server = TestServer::start().await.expect("Failed to start server");
    let response = server
        .delete(
            "/api/messages/delete?session_id=x",
            &json!({"chat_id": 1, "message_ids": []}),
        )
        .await
        .expect("Request failed");
    assert_error_code(response, StatusCode::BAD_REQUEST, "VALIDATION_ERROR")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_restore_session_rejects_garbage() {
    let server = TestServer::start().await.expect("Failed to start server");
    let response = server
        .post(
            "/api/auth/restore-session",
            &json!({"session_string": "%%% definitely not base64 %%%"}),
        )
        .await
        .expect("Request failed");
    assert_error_code(response, StatusCode::BAD_REQUEST, "INVALID_INPUT")
        .await
        .unwrap();
}

// ============================================================================
// Error envelope shape
// ============================================================================

#[tokio::test]
async fn test_error_envelope_has_code_and_message() {
    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/api/auth/me").await.expect("Request failed");
    assert_status(response, StatusCode::UNAUTHORIZED).await.ok();

    let response = server.get("/api/auth/me").await.expect("Request failed");
    let body: serde_json::Value = serde_json::from_str(&response.text().await.unwrap()).unwrap();
    assert!(body["error"]["code"].is_string());
    assert!(body["error"]["message"].is_string());
}
