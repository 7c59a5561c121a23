//! Configuration override and resolution handlers.

use axum::Json;
use axum::extract::{Path, Query, State};

use studiohub_entity::configuration::{ConfigScope, OverrideFields};

use crate::dto::request::{EffectiveConfigurationParams, SetConfigurationRequest};
use crate::error::ApiResult;
use crate::state::AppState;

/// PUT /api/configurations/{scope}/{scope_id}
pub async fn set_configuration(
    State(state): State<AppState>,
    Path((scope, scope_id)): Path<(String, i64)>,
    Json(req): Json<SetConfigurationRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    let scope: ConfigScope = scope.parse()?;

    let stored = state
        .resolver
        .set_override(
            scope,
            scope_id,
            OverrideFields {
                max_participants: req.max_participants,
                waitlist_enabled: req.waitlist_enabled,
                waitlist_max_size: req.waitlist_max_size,
                waitlist_strategy: req.waitlist_strategy,
                cancellation_min_hours_before_start: req.cancellation_min_hours_before_start,
                cancellation_allow_late_cancel: req.cancellation_allow_late_cancel,
            },
        )
        .await?;

    Ok(Json(serde_json::json!({ "success": true, "data": stored })))
}

/// DELETE /api/configurations/{scope}/{scope_id}
pub async fn delete_configuration(
    State(state): State<AppState>,
    Path((scope, scope_id)): Path<(String, i64)>,
) -> ApiResult<Json<serde_json::Value>> {
    let scope: ConfigScope = scope.parse()?;
    state.resolver.delete_override(scope, scope_id).await?;

    Ok(Json(serde_json::json!({ "success": true, "data": null })))
}

/// GET /api/configurations/effective
pub async fn get_effective_configuration(
    State(state): State<AppState>,
    Query(params): Query<EffectiveConfigurationParams>,
) -> ApiResult<Json<serde_json::Value>> {
    let effective = state
        .resolver
        .resolve(
            params.organization_id,
            params.headquarters_id,
            params.activity_id,
            params.session_id,
        )
        .await?;

    Ok(Json(serde_json::json!({ "success": true, "data": effective })))
}
