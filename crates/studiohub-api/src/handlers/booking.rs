//! Booking create, cancel, and lookup handlers.

use axum::Json;
use axum::extract::{Path, State};

use studiohub_core::error::AppError;

use crate::dto::request::CreateBookingRequest;
use crate::error::{ApiError, ApiResult};
use crate::extractors::IdempotencyKey;
use crate::handlers::validate_body;
use crate::state::AppState;

/// POST /api/bookings
///
/// The `Idempotency-Key` header, when present, makes retries safe: a
/// replayed request returns the original booking.
pub async fn create_booking(
    State(state): State<AppState>,
    key: IdempotencyKey,
    Json(req): Json<CreateBookingRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    validate_body(&req)?;

    let booking = state
        .reservations
        .create(req.session_id, req.user_id, key.as_deref())
        .await?;

    Ok(Json(serde_json::json!({ "success": true, "data": booking })))
}

/// POST /api/bookings/{id}/cancel
pub async fn cancel_booking(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    key: IdempotencyKey,
) -> ApiResult<Json<serde_json::Value>> {
    let outcome = state.reservations.cancel(id, key.as_deref()).await?;

    Ok(Json(serde_json::json!({ "success": true, "data": outcome })))
}

/// GET /api/bookings/{id}
pub async fn get_booking(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<serde_json::Value>> {
    let booking = state
        .booking_repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError(AppError::not_found("Booking not found")))?;

    Ok(Json(serde_json::json!({ "success": true, "data": booking })))
}

/// GET /api/users/{id}/bookings
pub async fn list_user_bookings(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> ApiResult<Json<serde_json::Value>> {
    let bookings = state.booking_repo.find_by_user(user_id).await?;

    Ok(Json(serde_json::json!({ "success": true, "data": bookings })))
}
