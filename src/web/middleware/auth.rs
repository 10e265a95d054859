//! Bearer token authentication middleware.
//!
//! [`jwt_auth`] runs on every request. A valid bearer token establishes a
//! [`Principal`] in the request extensions; a missing or bad token leaves the
//! request unauthenticated. Handlers decide what they need with the
//! [`AuthUser`] (required) and [`MaybeUser`] (optional) extractors.

use axum::{
    async_trait,
    body::Body,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap, Request},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use crate::auth::{Principal, TokenService};
use crate::web::error::ApiError;

/// Extract the token from an `Authorization: Bearer <token>` header.
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Optional bearer authentication gate.
///
/// Never rejects a request.
pub async fn jwt_auth(
    tokens: Arc<TokenService>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    if let Some(token) = bearer_token(request.headers()) {
        match tokens.verify(token) {
            Ok(username) => {
                tracing::debug!(username = %username, "Bearer token accepted");
                request.extensions_mut().insert(Principal::new(username));
            }
            Err(e) => {
                tracing::debug!("Bearer token rejected: {}", e);
            }
        }
    }
    next.run(request).await
}

/// Extractor for routes that require an authenticated principal.
///
/// Rejects with HTTP 401 and code `A0019` when the gate established none.
/// Missing, malformed and expired tokens are indistinguishable here.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Principal);

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Principal>()
            .cloned()
            .map(AuthUser)
            .ok_or_else(ApiError::unauthorized)
    }
}

/// Optional authentication extractor.
///
/// Similar to AuthUser but doesn't fail if no principal is established.
#[derive(Debug, Clone)]
pub struct MaybeUser(pub Option<Principal>);

#[async_trait]
impl<S> FromRequestParts<S> for MaybeUser
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(MaybeUser(parts.extensions.get::<Principal>().cloned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode, middleware, routing::get, Router};
    use http_body_util::BodyExt;
    use tower::util::ServiceExt;

    const SECRET: &str = "middleware-test-secret-32-bytes-long";

    async fn whoami(MaybeUser(principal): MaybeUser) -> String {
        principal
            .map(|p| p.username)
            .unwrap_or_else(|| "anonymous".to_string())
    }

    async fn protected(AuthUser(principal): AuthUser) -> String {
        principal.username
    }

    fn app(tokens: Arc<TokenService>) -> Router {
        Router::new()
            .route("/whoami", get(whoami))
            .route("/protected", get(protected))
            .layer(middleware::from_fn(move |req, next| {
                jwt_auth(tokens.clone(), req, next)
            }))
    }

    async fn call(app: Router, uri: &str, auth: Option<&str>) -> (StatusCode, String) {
        let mut builder = Request::builder().uri(uri);
        if let Some(value) = auth {
            builder = builder.header(AUTHORIZATION, value);
        }
        let response = app
            .oneshot(builder.body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[test]
    fn test_bearer_token() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), None);

        headers.insert(AUTHORIZATION, "Bearer abc.def.ghi".parse().unwrap());
        assert_eq!(bearer_token(&headers), Some("abc.def.ghi"));

        headers.insert(AUTHORIZATION, "Basic dXNlcjpwYXNz".parse().unwrap());
        assert_eq!(bearer_token(&headers), None);

        headers.insert(AUTHORIZATION, "Bearer ".parse().unwrap());
        assert_eq!(bearer_token(&headers), None);
    }

    #[tokio::test]
    async fn test_gate_establishes_principal() {
        let tokens = Arc::new(TokenService::new(SECRET, 3600));
        let token = tokens.issue("alice").unwrap();

        let (status, body) = call(
            app(tokens.clone()),
            "/whoami",
            Some(&format!("Bearer {}", token)),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "alice");
    }

    #[tokio::test]
    async fn test_gate_passes_through_without_token() {
        let tokens = Arc::new(TokenService::new(SECRET, 3600));
        let (status, body) = call(app(tokens), "/whoami", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "anonymous");
    }

    #[tokio::test]
    async fn test_gate_passes_through_with_bad_token() {
        let tokens = Arc::new(TokenService::new(SECRET, 3600));
        let (status, body) = call(app(tokens), "/whoami", Some("Bearer not-a-token")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "anonymous");
    }

    #[tokio::test]
    async fn test_auth_user_rejects_with_401() {
        let tokens = Arc::new(TokenService::new(SECRET, 3600));
        let expired = tokens
            .issue_at("alice", chrono::Utc::now().timestamp() as u64 - 7200)
            .unwrap();

        for auth in [
            None,
            Some("Bearer garbage".to_string()),
            Some(format!("Bearer {}", expired)),
        ] {
            let (status, body) = call(app(tokens.clone()), "/protected", auth.as_deref()).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED);
            let json: serde_json::Value = serde_json::from_str(&body).unwrap();
            assert_eq!(json["code"], "A0019");
        }
    }

    #[tokio::test]
    async fn test_auth_user_accepts_valid_token() {
        let tokens = Arc::new(TokenService::new(SECRET, 3600));
        let token = tokens.issue("bob").unwrap();
        let (status, body) = call(
            app(tokens),
            "/protected",
            Some(&format!("Bearer {}", token)),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "bob");
    }
}
