//! Test helpers for Web API integration tests.
//!
//! Provides an in-memory server and helpers for registering and logging in.

#![allow(dead_code)]

use axum_test::TestServer;
use serde_json::{json, Value};
use std::sync::Arc;

use stack_breeze::config::Config;
use stack_breeze::web::middleware::RateLimitState;
use stack_breeze::web::router::create_router;
use stack_breeze::web::AppState;
use stack_breeze::Database;

/// JWT secret used by every test server.
pub const TEST_SECRET: &str = "integration-test-secret-0123456789abcdef";

/// Default password that satisfies the complexity rules.
pub const TEST_PASSWORD: &str = "Passw0rd";

/// Create a test configuration with cheap password hashing.
pub fn create_test_config() -> Config {
    let mut config = Config::default();
    config.jwt.secret = TEST_SECRET.to_string();
    config.jwt.expiration_secs = 3600;
    config.password.memory_kib = 1024;
    config.password.iterations = 1;
    config.password.parallelism = 1;
    config.server.login_rate_limit = 100;
    config
}

/// Create a test server with an in-memory database.
pub async fn create_test_server() -> (TestServer, Database) {
    create_test_server_with_config(create_test_config()).await
}

/// Create a test server from the given configuration.
pub async fn create_test_server_with_config(config: Config) -> (TestServer, Database) {
    let db = Database::open_in_memory()
        .await
        .expect("Failed to create test database");

    let app_state =
        Arc::new(AppState::from_config(db.clone(), &config).expect("Failed to build app state"));
    let rate_limit = Arc::new(
        RateLimitState::new(config.server.login_rate_limit)
            .trust_proxy_headers(config.server.trust_proxy_headers),
    );

    let router = create_router(app_state, rate_limit, &config.server.cors_origins);
    let server = TestServer::new(router).expect("Failed to create test server");

    (server, db)
}

/// Register a user and return the response body.
pub async fn register_user(
    server: &TestServer,
    username: &str,
    email: &str,
    password: &str,
) -> Value {
    server
        .post("/api/auth/register")
        .json(&json!({
            "username": username,
            "email": email,
            "password": password
        }))
        .await
        .json::<Value>()
}

/// Log in and return the response body.
pub async fn login_user(server: &TestServer, username_or_email: &str, password: &str) -> Value {
    server
        .post("/api/auth/login")
        .json(&json!({
            "usernameOrEmail": username_or_email,
            "password": password
        }))
        .await
        .json::<Value>()
}

/// Register a user, log in and return the bearer token.
pub async fn register_and_login(server: &TestServer, username: &str) -> String {
    let email = format!("{username}@example.com");
    let body = register_user(server, username, &email, TEST_PASSWORD).await;
    assert_eq!(body["code"], "00000", "register failed: {body}");

    let body = login_user(server, username, TEST_PASSWORD).await;
    assert_eq!(body["code"], "00000", "login failed: {body}");
    body["data"]["accessToken"]
        .as_str()
        .expect("accessToken missing")
        .to_string()
}

/// Value for an `Authorization: Bearer` header.
pub fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}
