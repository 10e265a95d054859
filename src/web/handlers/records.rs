//! Daily life record handlers.
//!
//! Every route requires an authenticated principal.

use axum::{
    extract::{rejection::PathRejection, Path, State},
    Json,
};
use std::sync::Arc;

use super::AppState;
use crate::records::{DailyLifeRecord, NewRecord, RecordRepository, RecordUpdate};
use crate::web::dto::{request::required_content, ApiResponse, RecordRequest, ValidatedJson};
use crate::web::error::ApiError;
use crate::web::middleware::AuthUser;

/// GET /dailyLifeRecords/list - List records, newest first.
#[utoipa::path(
    get,
    path = "/dailyLifeRecords/list",
    tag = "records",
    responses(
        (status = 200, description = "Records", body = Vec<DailyLifeRecord>),
        (status = 401, description = "No valid bearer token (A0019)")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_records(
    State(state): State<Arc<AppState>>,
    AuthUser(_principal): AuthUser,
) -> Result<Json<ApiResponse<Vec<DailyLifeRecord>>>, ApiError> {
    let records = RecordRepository::new(state.db.pool()).list().await?;
    Ok(Json(ApiResponse::success(records)))
}

/// POST /dailyLifeRecords/save - Create a record owned by the caller.
#[utoipa::path(
    post,
    path = "/dailyLifeRecords/save",
    tag = "records",
    request_body = RecordRequest,
    responses(
        (status = 200, description = "Whether the record was saved", body = bool),
        (status = 401, description = "No valid bearer token (A0019)")
    ),
    security(("bearer_auth" = []))
)]
pub async fn save_record(
    State(state): State<Arc<AppState>>,
    AuthUser(principal): AuthUser,
    ValidatedJson(req): ValidatedJson<RecordRequest>,
) -> Result<Json<ApiResponse<bool>>, ApiError> {
    let content = required_content(req.content)?;
    let new_record = NewRecord {
        content,
        remark: req.remark,
        create_by: principal.username,
    };

    let record = RecordRepository::new(state.db.pool())
        .create(&new_record)
        .await?;
    tracing::info!(id = record.id, username = %new_record.create_by, "Daily life record saved");

    Ok(Json(ApiResponse::success(true)))
}

/// POST|DELETE /dailyLifeRecords/remove/{id} - Soft-delete a record.
#[utoipa::path(
    delete,
    path = "/dailyLifeRecords/remove/{id}",
    tag = "records",
    params(("id" = i64, Path, description = "Record ID")),
    responses(
        (status = 200, description = "Whether the record was deleted", body = bool),
        (status = 401, description = "No valid bearer token (A0019)")
    ),
    security(("bearer_auth" = []))
)]
pub async fn remove_record(
    State(state): State<Arc<AppState>>,
    AuthUser(principal): AuthUser,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<ApiResponse<bool>>, ApiError> {
    let Path(id) = id.map_err(|_| ApiError::bad_request("id must be a number"))?;

    let deleted = RecordRepository::new(state.db.pool())
        .delete(id, &principal.username)
        .await?;
    tracing::info!(id, deleted, username = %principal.username, "Daily life record remove");

    Ok(Json(ApiResponse::success(deleted)))
}

/// POST /dailyLifeRecords/update - Update a record.
#[utoipa::path(
    post,
    path = "/dailyLifeRecords/update",
    tag = "records",
    request_body = RecordRequest,
    responses(
        (status = 200, description = "Whether the record was updated", body = bool),
        (status = 401, description = "No valid bearer token (A0019)")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_record(
    State(state): State<Arc<AppState>>,
    AuthUser(principal): AuthUser,
    ValidatedJson(req): ValidatedJson<RecordRequest>,
) -> Result<Json<ApiResponse<bool>>, ApiError> {
    let id = req.id.ok_or_else(|| ApiError::bad_request("id is required"))?;
    let update = RecordUpdate {
        content: req.content,
        remark: req.remark.map(Some),
        update_by: principal.username,
    };

    let updated = RecordRepository::new(state.db.pool())
        .update(id, &update)
        .await?;
    tracing::info!(id, updated, username = %update.update_by, "Daily life record update");

    Ok(Json(ApiResponse::success(updated)))
}
