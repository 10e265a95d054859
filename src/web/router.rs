//! Router configuration for Web API.

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::handlers::{
    batch_update_websites, delete_category, delete_website, list_categories, list_records,
    list_websites, list_websites_by_category, login, profile, register, remove_record,
    save_category, save_record, save_website, update_category, update_record, update_website,
    AppState,
};
use super::middleware::{
    create_cors_layer, jwt_auth, login_rate_limit, security_headers, RateLimitState,
};
use super::openapi::ApiDoc;

/// Create the main API router.
pub fn create_router(
    app_state: Arc<AppState>,
    rate_limit: Arc<RateLimitState>,
    cors_origins: &[String],
) -> Router {
    // Login is rate limited per client IP
    let login_route = post(login).layer(middleware::from_fn(move |req, next| {
        let state = rate_limit.clone();
        login_rate_limit(state, req, next)
    }));

    let auth_routes = Router::new()
        .route("/register", post(register))
        .route("/login", login_route)
        .route("/profile", get(profile));

    let category_routes = Router::new()
        .route("/save", post(save_category))
        .route("/delete", post(delete_category))
        .route("/update", post(update_category))
        .route("/list", get(list_categories));

    let website_routes = Router::new()
        .route("/save", post(save_website))
        .route("/delete", post(delete_website))
        .route("/update", axum::routing::put(update_website))
        .route("/batchUpdate", post(batch_update_websites))
        .route("/list", get(list_websites))
        .route("/listByCategory", get(list_websites_by_category));

    let api_routes = Router::new()
        .nest("/auth", auth_routes)
        .nest("/navigationCategory", category_routes)
        .nest("/navigationWebsite", website_routes);

    // Daily life records (authentication required)
    let record_routes = Router::new()
        .route("/list", get(list_records))
        .route("/save", post(save_record))
        .route("/remove/:id", post(remove_record).delete(remove_record))
        .route("/update", post(update_record));

    let tokens = app_state.users.tokens().clone();

    Router::new()
        .nest("/api", api_routes)
        .nest("/dailyLifeRecords", record_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(create_cors_layer(cors_origins))
                .layer(middleware::from_fn(security_headers))
                .layer(middleware::from_fn(move |req, next| {
                    let tokens = tokens.clone();
                    jwt_auth(tokens, req, next)
                })),
        )
        .with_state(app_state)
}

/// Create a health check router.
pub fn create_health_router() -> Router {
    Router::new().route("/health", get(health_check))
}

/// Health check handler.
async fn health_check() -> &'static str {
    "OK"
}

/// Create the Swagger UI router serving the OpenAPI document.
pub fn create_swagger_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum_test::TestServer;

    #[tokio::test]
    async fn test_health_check() {
        let server = TestServer::new(create_health_router()).unwrap();
        let response = server.get("/health").await;
        response.assert_status_ok();
        response.assert_text("OK");
    }

    #[tokio::test]
    async fn test_openapi_document_served() {
        let server = TestServer::new(create_swagger_router()).unwrap();
        let response = server.get("/api-docs/openapi.json").await;
        response.assert_status_ok();

        let doc: serde_json::Value = response.json();
        assert!(doc["paths"]["/api/auth/login"].is_object());
        assert!(doc["paths"]["/dailyLifeRecords/list"].is_object());
        assert!(doc["components"]["securitySchemes"]["bearer_auth"].is_object());
    }
}
