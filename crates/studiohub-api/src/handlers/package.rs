//! Package purchase, listing, and credit handlers.

use axum::Json;
use axum::extract::{Path, State};

use studiohub_core::error::AppError;
use studiohub_entity::package::CreatePackage;

use crate::dto::request::PurchasePackageRequest;
use crate::error::{ApiError, ApiResult};
use crate::handlers::validate_body;
use crate::state::AppState;

/// POST /api/packages
pub async fn purchase_package(
    State(state): State<AppState>,
    Json(req): Json<PurchasePackageRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    validate_body(&req)?;

    let package = state
        .credits
        .purchase_package(CreatePackage {
            user_id: req.user_id,
            payment_id: req.payment_id,
            credits: req
                .credits
                .iter()
                .map(|line| (line.activity_id, line.tokens))
                .collect(),
        })
        .await?;

    Ok(Json(serde_json::json!({ "success": true, "data": package })))
}

/// GET /api/packages/{id}
pub async fn get_package(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<serde_json::Value>> {
    let package = state
        .package_repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError(AppError::not_found("Package not found")))?;
    let credits = state.package_repo.find_credits(id).await?;

    Ok(Json(serde_json::json!({
        "success": true,
        "data": { "package": package, "credits": credits }
    })))
}

/// POST /api/packages/{id}/deactivate
pub async fn deactivate_package(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<serde_json::Value>> {
    state.credits.deactivate_package(id).await?;

    Ok(Json(serde_json::json!({ "success": true, "data": null })))
}

/// GET /api/users/{id}/packages
pub async fn list_user_packages(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> ApiResult<Json<serde_json::Value>> {
    // Lapsed packages drop out of the listing on first read.
    state.credits.expire_lapsed(user_id).await?;
    let packages = state.package_repo.find_active_by_user(user_id).await?;

    Ok(Json(serde_json::json!({ "success": true, "data": packages })))
}

/// GET /api/users/{user_id}/credits/{activity_id}
pub async fn check_credit(
    State(state): State<AppState>,
    Path((user_id, activity_id)): Path<(i64, i64)>,
) -> ApiResult<Json<serde_json::Value>> {
    let available = state.credits.has_available_credit(user_id, activity_id).await?;

    Ok(Json(serde_json::json!({
        "success": true,
        "data": { "user_id": user_id, "activity_id": activity_id, "available": available }
    })))
}
