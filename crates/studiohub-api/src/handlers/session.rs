//! Session listing and generation handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use chrono::Utc;

use studiohub_core::error::AppError;
use studiohub_entity::session::{CreateSession, SessionSource, SessionStatus};

use crate::dto::request::{
    CreateSessionRequest, GenerateSessionsRequest, UpcomingSessionsParams,
    UpdateSessionStatusRequest,
};
use crate::error::{ApiError, ApiResult};
use crate::handlers::validate_body;
use crate::state::AppState;

/// GET /api/sessions
pub async fn list_sessions(
    State(state): State<AppState>,
    Query(params): Query<UpcomingSessionsParams>,
) -> ApiResult<Json<serde_json::Value>> {
    let sessions = state
        .session_repo
        .find_upcoming(params.organization_id, params.headquarters_id, Utc::now())
        .await?;

    Ok(Json(serde_json::json!({ "success": true, "data": sessions })))
}

/// GET /api/sessions/{id}
pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<serde_json::Value>> {
    let session = state
        .session_repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError(AppError::not_found("Session not found")))?;

    Ok(Json(serde_json::json!({ "success": true, "data": session })))
}

/// POST /api/sessions
///
/// Manual session entry. The configuration stamped onto the session is
/// resolved from the scope hierarchy at this moment.
pub async fn create_session(
    State(state): State<AppState>,
    Json(req): Json<CreateSessionRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    validate_body(&req)?;
    if req.ends_at <= req.starts_at {
        return Err(ApiError(AppError::validation(
            "ends_at must be after starts_at",
        )));
    }

    let configuration = state
        .resolver
        .resolve(
            req.organization_id,
            req.headquarters_id,
            req.activity_id,
            None,
        )
        .await?;
    let session = state
        .session_repo
        .create(&CreateSession {
            organization_id: req.organization_id,
            headquarters_id: req.headquarters_id,
            activity_id: req.activity_id,
            starts_at: req.starts_at,
            ends_at: req.ends_at,
            source: SessionSource::Manual,
            configuration,
        })
        .await?;

    Ok(Json(serde_json::json!({ "success": true, "data": session })))
}

/// PUT /api/sessions/{id}/status
pub async fn update_session_status(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateSessionStatusRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    let status: SessionStatus = req.status.parse()?;

    if !state.session_repo.update_status(id, status).await? {
        return Err(ApiError(AppError::not_found("Session not found")));
    }

    Ok(Json(serde_json::json!({
        "success": true,
        "data": { "id": id, "status": status }
    })))
}

/// POST /api/sessions/generate
///
/// Runs the weekly generator on demand, either for the requested week
/// or for next week. Safe to call repeatedly; existing sessions are
/// skipped.
pub async fn generate_sessions(
    State(state): State<AppState>,
    Json(req): Json<GenerateSessionsRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    let summary = match req.week_start {
        Some(week_start) => state.generator.generate_for_week(week_start).await?,
        None => state.generator.generate_next_week().await?,
    };

    Ok(Json(serde_json::json!({ "success": true, "data": summary })))
}
