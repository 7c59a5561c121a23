//! Schedule listing and deactivation handlers.

use axum::Json;
use axum::extract::{Path, State};

use studiohub_core::error::AppError;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// GET /api/schedules
pub async fn list_schedules(
    State(state): State<AppState>,
) -> ApiResult<Json<serde_json::Value>> {
    let schedules = state.schedule_repo.find_active().await?;

    Ok(Json(serde_json::json!({ "success": true, "data": schedules })))
}

/// POST /api/schedules/{id}/deactivate
///
/// Stops the schedule from producing sessions in future generation runs.
/// Already-generated sessions are untouched.
pub async fn deactivate_schedule(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<serde_json::Value>> {
    state
        .schedule_repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError(AppError::not_found("Schedule not found")))?;
    state.schedule_repo.deactivate(id).await?;

    Ok(Json(serde_json::json!({ "success": true, "data": null })))
}
