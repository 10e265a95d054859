//! Navigation category and website handlers.
//!
//! These routes are public.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    Json,
};
use std::sync::Arc;
use validator::Validate;

use super::AppState;
use crate::navigation::{
    self, CategoryRepository, CategoryWithWebsites, NavigationCategory, NavigationWebsite,
    WebsiteRepository,
};
use crate::web::dto::{ApiResponse, CategoryRequest, IdQuery, ValidatedJson, WebsiteRequest};
use crate::web::error::ApiError;
use crate::web::middleware::MaybeUser;

fn query_id(query: Result<Query<IdQuery>, QueryRejection>) -> Result<i64, ApiError> {
    query
        .map(|Query(q)| q.id)
        .map_err(|_| ApiError::bad_request("id must be a number"))
}

// ============================================================================
// Categories
// ============================================================================

/// POST /api/navigationCategory/save - Create a category.
#[utoipa::path(
    post,
    path = "/api/navigationCategory/save",
    tag = "navigation",
    request_body = CategoryRequest,
    responses((status = 200, description = "Whether the category was saved", body = bool))
)]
pub async fn save_category(
    State(state): State<Arc<AppState>>,
    MaybeUser(principal): MaybeUser,
    ValidatedJson(req): ValidatedJson<CategoryRequest>,
) -> Result<Json<ApiResponse<bool>>, ApiError> {
    let mut new_category = req.into_new()?;
    new_category.create_by = principal.map(|p| p.username);

    let category = CategoryRepository::new(state.db.pool())
        .create(&new_category)
        .await?;
    tracing::info!(id = category.id, name = %category.category_name, "Navigation category saved");

    Ok(Json(ApiResponse::success(true)))
}

/// POST /api/navigationCategory/delete?id= - Soft-delete a category.
#[utoipa::path(
    post,
    path = "/api/navigationCategory/delete",
    tag = "navigation",
    params(IdQuery),
    responses((status = 200, description = "Whether the category was deleted", body = bool))
)]
pub async fn delete_category(
    State(state): State<Arc<AppState>>,
    MaybeUser(principal): MaybeUser,
    query: Result<Query<IdQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<bool>>, ApiError> {
    let id = query_id(query)?;
    let deleted_by = principal.as_ref().map(|p| p.username.as_str());

    let deleted = CategoryRepository::new(state.db.pool())
        .delete(id, deleted_by)
        .await?;
    tracing::info!(id, deleted, "Navigation category delete");

    Ok(Json(ApiResponse::success(deleted)))
}

/// POST /api/navigationCategory/update - Update a category.
#[utoipa::path(
    post,
    path = "/api/navigationCategory/update",
    tag = "navigation",
    request_body = CategoryRequest,
    responses((status = 200, description = "Whether the category was updated", body = bool))
)]
pub async fn update_category(
    State(state): State<Arc<AppState>>,
    MaybeUser(principal): MaybeUser,
    ValidatedJson(req): ValidatedJson<CategoryRequest>,
) -> Result<Json<ApiResponse<bool>>, ApiError> {
    let (id, mut update) = req.into_update()?;
    update.update_by = principal.map(|p| p.username);

    let updated = CategoryRepository::new(state.db.pool())
        .update(id, &update)
        .await?;
    tracing::info!(id, updated, "Navigation category update");

    Ok(Json(ApiResponse::success(updated)))
}

/// GET /api/navigationCategory/list - List categories.
#[utoipa::path(
    get,
    path = "/api/navigationCategory/list",
    tag = "navigation",
    responses((status = 200, description = "Categories ordered by sort key", body = Vec<NavigationCategory>))
)]
pub async fn list_categories(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<NavigationCategory>>>, ApiError> {
    let categories = CategoryRepository::new(state.db.pool()).list().await?;
    Ok(Json(ApiResponse::success(categories)))
}

// ============================================================================
// Websites
// ============================================================================

/// POST /api/navigationWebsite/save - Create a website.
#[utoipa::path(
    post,
    path = "/api/navigationWebsite/save",
    tag = "navigation",
    request_body = WebsiteRequest,
    responses((status = 200, description = "Whether the website was saved", body = bool))
)]
pub async fn save_website(
    State(state): State<Arc<AppState>>,
    MaybeUser(principal): MaybeUser,
    ValidatedJson(req): ValidatedJson<WebsiteRequest>,
) -> Result<Json<ApiResponse<bool>>, ApiError> {
    let mut new_website = req.into_new()?;
    new_website.create_by = principal.map(|p| p.username);

    let website = WebsiteRepository::new(state.db.pool())
        .create(&new_website)
        .await?;
    tracing::info!(id = website.id, name = %website.site_name, "Navigation website saved");

    Ok(Json(ApiResponse::success(true)))
}

/// POST /api/navigationWebsite/delete?id= - Soft-delete a website.
#[utoipa::path(
    post,
    path = "/api/navigationWebsite/delete",
    tag = "navigation",
    params(IdQuery),
    responses((status = 200, description = "Whether the website was deleted", body = bool))
)]
pub async fn delete_website(
    State(state): State<Arc<AppState>>,
    MaybeUser(principal): MaybeUser,
    query: Result<Query<IdQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<bool>>, ApiError> {
    let id = query_id(query)?;
    let deleted_by = principal.as_ref().map(|p| p.username.as_str());

    let deleted = WebsiteRepository::new(state.db.pool())
        .delete(id, deleted_by)
        .await?;
    tracing::info!(id, deleted, "Navigation website delete");

    Ok(Json(ApiResponse::success(deleted)))
}

/// PUT /api/navigationWebsite/update - Update a website.
#[utoipa::path(
    put,
    path = "/api/navigationWebsite/update",
    tag = "navigation",
    request_body = WebsiteRequest,
    responses((status = 200, description = "Whether the website was updated", body = bool))
)]
pub async fn update_website(
    State(state): State<Arc<AppState>>,
    MaybeUser(principal): MaybeUser,
    ValidatedJson(req): ValidatedJson<WebsiteRequest>,
) -> Result<Json<ApiResponse<bool>>, ApiError> {
    let (id, mut update) = req.into_update()?;
    update.update_by = principal.map(|p| p.username);

    let updated = WebsiteRepository::new(state.db.pool())
        .update(id, &update)
        .await?;
    tracing::info!(id, updated, "Navigation website update");

    Ok(Json(ApiResponse::success(updated)))
}

/// POST /api/navigationWebsite/batchUpdate - Update several websites at once.
#[utoipa::path(
    post,
    path = "/api/navigationWebsite/batchUpdate",
    tag = "navigation",
    request_body = Vec<WebsiteRequest>,
    responses((status = 200, description = "True if every website was updated", body = bool))
)]
pub async fn batch_update_websites(
    State(state): State<Arc<AppState>>,
    MaybeUser(principal): MaybeUser,
    body: Result<Json<Vec<WebsiteRequest>>, JsonRejection>,
) -> Result<Json<ApiResponse<bool>>, ApiError> {
    let Json(reqs) =
        body.map_err(|e| ApiError::bad_request(format!("Invalid JSON: {}", e.body_text())))?;

    let update_by = principal.map(|p| p.username);
    let mut updates = Vec::with_capacity(reqs.len());
    for req in reqs {
        req.validate().map_err(ApiError::from_validation_errors)?;
        let (id, mut update) = req.into_update()?;
        update.update_by = update_by.clone();
        updates.push((id, update));
    }

    let updated = WebsiteRepository::new(state.db.pool())
        .batch_update(&updates)
        .await?;
    tracing::info!(count = updates.len(), updated, "Navigation website batch update");

    Ok(Json(ApiResponse::success(updated)))
}

/// GET /api/navigationWebsite/list - List websites.
#[utoipa::path(
    get,
    path = "/api/navigationWebsite/list",
    tag = "navigation",
    responses((status = 200, description = "Websites ordered by sort key", body = Vec<NavigationWebsite>))
)]
pub async fn list_websites(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<NavigationWebsite>>>, ApiError> {
    let websites = WebsiteRepository::new(state.db.pool()).list().await?;
    Ok(Json(ApiResponse::success(websites)))
}

/// GET /api/navigationWebsite/listByCategory - Websites grouped by category.
#[utoipa::path(
    get,
    path = "/api/navigationWebsite/listByCategory",
    tag = "navigation",
    responses((status = 200, description = "Categories with their websites", body = Vec<CategoryWithWebsites>))
)]
pub async fn list_websites_by_category(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<CategoryWithWebsites>>>, ApiError> {
    let groups = navigation::list_by_category(state.db.pool()).await?;
    Ok(Json(ApiResponse::success(groups)))
}
