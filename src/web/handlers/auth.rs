//! Authentication handlers.

use axum::{extract::State, Json};
use std::sync::Arc;

use super::AppState;
use crate::auth::{LoginCommand, LoginResult, RegisterCommand, UserProfile};
use crate::web::dto::{ApiResponse, LoginRequest, RegisterRequest, ValidatedJson};
use crate::web::error::ApiError;
use crate::web::middleware::AuthUser;

/// POST /api/auth/register - Register a new user.
#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "auth",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "Registered profile, or A0001/A0015/A0016 in the envelope", body = UserProfile)
    )
)]
pub async fn register(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<RegisterRequest>,
) -> Result<Json<ApiResponse<UserProfile>>, ApiError> {
    let profile = state
        .users
        .register(RegisterCommand {
            username: req.username,
            email: req.email,
            password: req.password,
        })
        .await?;

    Ok(Json(ApiResponse::success(profile)))
}

/// POST /api/auth/login - Log in with username or email.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Bearer token and profile, or A0012 in the envelope", body = LoginResult),
        (status = 429, description = "Too many login attempts (A0020)")
    )
)]
pub async fn login(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResult>>, ApiError> {
    let result = state
        .users
        .login(LoginCommand {
            username_or_email: req.username_or_email,
            password: req.password,
        })
        .await?;

    Ok(Json(ApiResponse::success(result)))
}

/// GET /api/auth/profile - Current user's profile.
#[utoipa::path(
    get,
    path = "/api/auth/profile",
    tag = "auth",
    responses(
        (status = 200, description = "Current profile", body = UserProfile),
        (status = 401, description = "No valid bearer token (A0019)")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn profile(
    State(state): State<Arc<AppState>>,
    AuthUser(principal): AuthUser,
) -> Result<Json<ApiResponse<UserProfile>>, ApiError> {
    let profile = state.users.current_profile(Some(&principal)).await?;
    Ok(Json(ApiResponse::success(profile)))
}
