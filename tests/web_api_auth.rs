//! Web API Authentication Tests
//!
//! Integration tests for registration, login and profile endpoints.

mod common;

use axum::body::Bytes;
use axum::http::header::AUTHORIZATION;
use axum::http::StatusCode;
use serde_json::{json, Value};

use common::{
    bearer, create_test_config, create_test_server, create_test_server_with_config, login_user,
    register_user, TEST_PASSWORD,
};
use stack_breeze::auth::TokenService;

// ============================================================================
// Registration Tests
// ============================================================================

#[tokio::test]
async fn test_register_success() {
    let (server, _db) = create_test_server().await;

    let response = server
        .post("/api/auth/register")
        .json(&json!({
            "username": "alice",
            "email": "alice@example.com",
            "password": TEST_PASSWORD
        }))
        .await;

    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["code"], "00000");
    assert_eq!(body["message"], "OK");
    assert!(body["timestamp"].is_i64());
    assert!(body["data"]["id"].is_i64());
    assert_eq!(body["data"]["username"], "alice");
    assert_eq!(body["data"]["email"], "alice@example.com");
    assert!(body["data"]["createTime"].is_string());
    assert!(body["data"].get("password").is_none());
}

#[tokio::test]
async fn test_register_duplicate_username() {
    let (server, _db) = create_test_server().await;

    register_user(&server, "alice", "alice@example.com", TEST_PASSWORD).await;
    let response = server
        .post("/api/auth/register")
        .json(&json!({
            "username": "alice",
            "email": "other@example.com",
            "password": TEST_PASSWORD
        }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["code"], "A0015");
    assert_eq!(body["message"], "Username already exists");
    assert!(body["data"].is_null());
}

#[tokio::test]
async fn test_register_duplicate_email() {
    let (server, _db) = create_test_server().await;

    register_user(&server, "alice", "alice@example.com", TEST_PASSWORD).await;
    let body = register_user(&server, "alice2", "alice@example.com", TEST_PASSWORD).await;

    assert_eq!(body["code"], "A0016");
    assert_eq!(body["message"], "Email already exists");
}

#[tokio::test]
async fn test_register_invalid_input() {
    let (server, _db) = create_test_server().await;

    let body = register_user(&server, "ab", "ab@example.com", TEST_PASSWORD).await;
    assert_eq!(body["code"], "A0001");
    assert_eq!(
        body["message"],
        "username must be between 3 and 20 characters"
    );

    let body = register_user(&server, "alice", "not-an-email", TEST_PASSWORD).await;
    assert_eq!(body["code"], "A0001");
    assert_eq!(body["message"], "invalid email format");

    let body = register_user(&server, "alice", "alice@example.com", "password").await;
    assert_eq!(body["code"], "A0001");
}

#[tokio::test]
async fn test_register_malformed_json() {
    let (server, _db) = create_test_server().await;

    let response = server
        .post("/api/auth/register")
        .content_type("application/json")
        .bytes(Bytes::from_static(b"{not json"))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["code"], "A0001");
    assert!(body["message"]
        .as_str()
        .unwrap()
        .starts_with("Invalid JSON"));
}

// ============================================================================
// Login Tests
// ============================================================================

#[tokio::test]
async fn test_login_by_username_and_email() {
    let (server, _db) = create_test_server().await;
    register_user(&server, "alice", "alice@example.com", TEST_PASSWORD).await;

    for identifier in ["alice", "alice@example.com"] {
        let body = login_user(&server, identifier, TEST_PASSWORD).await;
        assert_eq!(body["code"], "00000");
        assert!(body["data"]["accessToken"].is_string());
        assert_eq!(body["data"]["tokenType"], "Bearer");
        assert_eq!(body["data"]["expiresIn"], 3600);
        assert_eq!(body["data"]["userInfo"]["username"], "alice");
    }
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let (server, _db) = create_test_server().await;
    register_user(&server, "alice", "alice@example.com", TEST_PASSWORD).await;

    let wrong_password = login_user(&server, "alice", "Wrong0pass").await;
    let unknown_user = login_user(&server, "nobody", TEST_PASSWORD).await;

    assert_eq!(wrong_password["code"], "A0012");
    assert_eq!(unknown_user["code"], "A0012");
    assert_eq!(wrong_password["message"], unknown_user["message"]);
    assert!(wrong_password["data"].is_null());
}

#[tokio::test]
async fn test_login_empty_identifier() {
    let (server, _db) = create_test_server().await;

    let body = login_user(&server, "", TEST_PASSWORD).await;
    assert_eq!(body["code"], "A0001");
}

#[tokio::test]
async fn test_login_rate_limit() {
    let mut config = create_test_config();
    config.server.login_rate_limit = 2;
    config.server.trust_proxy_headers = true;
    let (server, _db) = create_test_server_with_config(config).await;

    for _ in 0..2 {
        let response = server
            .post("/api/auth/login")
            .add_header("X-Forwarded-For", "203.0.113.9")
            .json(&json!({ "usernameOrEmail": "nobody", "password": TEST_PASSWORD }))
            .await;
        response.assert_status_ok();
    }

    let response = server
        .post("/api/auth/login")
        .add_header("X-Forwarded-For", "203.0.113.9")
        .json(&json!({ "usernameOrEmail": "nobody", "password": TEST_PASSWORD }))
        .await;
    response.assert_status(StatusCode::TOO_MANY_REQUESTS);
    let body: Value = response.json();
    assert_eq!(body["code"], "A0020");

    // Another client is unaffected
    let response = server
        .post("/api/auth/login")
        .add_header("X-Forwarded-For", "198.51.100.1")
        .json(&json!({ "usernameOrEmail": "nobody", "password": TEST_PASSWORD }))
        .await;
    response.assert_status_ok();

    // Registration is not rate limited
    let body = register_user(&server, "alice", "alice@example.com", TEST_PASSWORD).await;
    assert_eq!(body["code"], "00000");
}

#[tokio::test]
async fn test_login_rate_limit_ignores_untrusted_forwarded_for() {
    let mut config = create_test_config();
    config.server.login_rate_limit = 2;
    let (server, _db) = create_test_server_with_config(config).await;

    let mut statuses = Vec::new();
    for i in 0..3 {
        let response = server
            .post("/api/auth/login")
            .add_header("X-Forwarded-For", format!("203.0.113.{i}"))
            .json(&json!({ "usernameOrEmail": "nobody", "password": TEST_PASSWORD }))
            .await;
        statuses.push(response.status_code());
    }

    assert_eq!(
        statuses,
        vec![StatusCode::OK, StatusCode::OK, StatusCode::TOO_MANY_REQUESTS]
    );
}

// ============================================================================
// Profile Tests
// ============================================================================

#[tokio::test]
async fn test_register_login_profile_flow() {
    let (server, _db) = create_test_server().await;

    let registered = register_user(&server, "alice", "alice@example.com", TEST_PASSWORD).await;
    assert_eq!(registered["code"], "00000");

    let login = login_user(&server, "alice", TEST_PASSWORD).await;
    let token = login["data"]["accessToken"].as_str().unwrap();

    let response = server
        .get("/api/auth/profile")
        .add_header(AUTHORIZATION, bearer(token))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["code"], "00000");
    assert_eq!(body["data"]["username"], "alice");
    assert_eq!(body["data"]["email"], "alice@example.com");
    assert_eq!(body["data"]["id"], registered["data"]["id"]);
}

#[tokio::test]
async fn test_profile_without_token() {
    let (server, _db) = create_test_server().await;

    let response = server.get("/api/auth/profile").await;

    response.assert_status(StatusCode::UNAUTHORIZED);
    let body: Value = response.json();
    assert_eq!(body["code"], "A0019");
    assert!(body["data"].is_null());
}

#[tokio::test]
async fn test_profile_with_bad_tokens() {
    let (server, _db) = create_test_server().await;
    register_user(&server, "alice", "alice@example.com", TEST_PASSWORD).await;

    let forged = TokenService::new("some-other-secret-0123456789abcdef", 3600)
        .issue("alice")
        .unwrap();
    let two_hours_ago = chrono::Utc::now().timestamp() as u64 - 7200;
    let expired = TokenService::new(common::TEST_SECRET, 60)
        .issue_at("alice", two_hours_ago)
        .unwrap();

    for token in ["garbage", forged.as_str(), expired.as_str()] {
        let response = server
            .get("/api/auth/profile")
            .add_header(AUTHORIZATION, bearer(token))
            .await;
        response.assert_status(StatusCode::UNAUTHORIZED);
        let body: Value = response.json();
        assert_eq!(body["code"], "A0019");
    }
}

#[tokio::test]
async fn test_profile_of_removed_user() {
    let (server, db) = create_test_server().await;
    let token = common::register_and_login(&server, "alice").await;

    sqlx::query("UPDATE users SET del_flag = '1' WHERE username = $1")
        .bind("alice")
        .execute(db.pool())
        .await
        .unwrap();

    let response = server
        .get("/api/auth/profile")
        .add_header(AUTHORIZATION, bearer(&token))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["code"], "A0010");
}

#[tokio::test]
async fn test_security_headers_present() {
    let (server, _db) = create_test_server().await;

    let response = server.get("/api/navigationCategory/list").await;
    response.assert_status_ok();
    assert_eq!(response.header("X-Content-Type-Options"), "nosniff");
}
