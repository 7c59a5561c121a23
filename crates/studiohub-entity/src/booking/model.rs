//! Booking entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::status::BookingStatus;

/// A user's claim on a session.
///
/// At most one non-cancelled booking may exist per `(session, user)` pair;
/// the reservation engine enforces this under the session row lock rather
/// than through a storage constraint. The two request-id columns carry the
/// caller-supplied idempotency keys.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Booking {
    /// Unique booking identifier.
    pub id: i64,
    /// The session being claimed.
    pub session_id: i64,
    /// The claiming user.
    pub user_id: i64,
    /// Lifecycle status.
    pub status: BookingStatus,
    /// The package a credit was consumed from, for refund traceability.
    pub consumed_package_id: Option<i64>,
    /// Idempotency key of the create request.
    pub create_request_id: Option<String>,
    /// Idempotency key of the cancel request.
    pub cancel_request_id: Option<String>,
    /// The booking whose cancellation promoted this one off the waitlist.
    pub promoted_from_booking_id: Option<i64>,
    /// When the booking was created.
    pub created_at: DateTime<Utc>,
    /// When the booking was cancelled.
    pub cancelled_at: Option<DateTime<Utc>>,
}

impl Booking {
    /// Whether the booking still claims a spot (confirmed or waitlisted).
    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }
}

/// Data required to create a new booking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBooking {
    /// The session being claimed.
    pub session_id: i64,
    /// The claiming user.
    pub user_id: i64,
    /// Admission outcome (confirmed or waitlisted).
    pub status: BookingStatus,
    /// The package a credit was consumed from.
    pub consumed_package_id: Option<i64>,
    /// Idempotency key of the create request, if any.
    pub create_request_id: Option<String>,
}
