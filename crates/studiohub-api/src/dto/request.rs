//! Request DTOs with validation.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use studiohub_entity::configuration::WaitlistStrategy;

/// Create booking request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateBookingRequest {
    /// Session to book.
    #[validate(range(min = 1, message = "session_id must be positive"))]
    pub session_id: i64,
    /// Booking user.
    #[validate(range(min = 1, message = "user_id must be positive"))]
    pub user_id: i64,
}

/// Manual session entry body. The stamped configuration is resolved from
/// the scope hierarchy at creation time.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateSessionRequest {
    /// Owning organization.
    #[validate(range(min = 1, message = "organization_id must be positive"))]
    pub organization_id: i64,
    /// Headquarters the session runs at.
    #[validate(range(min = 1, message = "headquarters_id must be positive"))]
    pub headquarters_id: i64,
    /// The activity being held.
    #[validate(range(min = 1, message = "activity_id must be positive"))]
    pub activity_id: i64,
    /// When the session starts.
    pub starts_at: DateTime<Utc>,
    /// When the session ends.
    pub ends_at: DateTime<Utc>,
}

/// Session status transition body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateSessionStatusRequest {
    /// Target status: open, closed, or cancelled.
    pub status: String,
}

/// Session generation request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateSessionsRequest {
    /// Monday of the target week. Defaults to next week when absent.
    pub week_start: Option<NaiveDate>,
}

/// One credit line of a package purchase.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PackageCreditLine {
    /// Activity the tokens are valid for.
    #[validate(range(min = 1, message = "activity_id must be positive"))]
    pub activity_id: i64,
    /// Token count.
    #[validate(range(min = 1, message = "tokens must be positive"))]
    pub tokens: i32,
}

/// Purchase package request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PurchasePackageRequest {
    /// Owning user.
    #[validate(range(min = 1, message = "user_id must be positive"))]
    pub user_id: i64,
    /// Payment backing the purchase.
    #[validate(range(min = 1, message = "payment_id must be positive"))]
    pub payment_id: i64,
    /// Credits to load, one line per activity.
    #[validate(length(min = 1, message = "At least one credit line is required"), nested)]
    pub credits: Vec<PackageCreditLine>,
}

/// Configuration override write body. All fields optional; unset fields
/// inherit from the parent scope.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SetConfigurationRequest {
    /// Maximum confirmed participants.
    pub max_participants: Option<i32>,
    /// Whether the waitlist is enabled.
    pub waitlist_enabled: Option<bool>,
    /// Maximum waitlisted bookings.
    pub waitlist_max_size: Option<i32>,
    /// Waitlist promotion strategy.
    pub waitlist_strategy: Option<WaitlistStrategy>,
    /// Minimum hours before start for a free cancellation.
    pub cancellation_min_hours_before_start: Option<i32>,
    /// Whether late cancellation is allowed.
    pub cancellation_allow_late_cancel: Option<bool>,
}

/// Query parameters for the effective-configuration endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffectiveConfigurationParams {
    /// Organization id.
    pub organization_id: i64,
    /// Headquarters id.
    pub headquarters_id: i64,
    /// Activity id.
    pub activity_id: i64,
    /// Optional concrete session id.
    pub session_id: Option<i64>,
}

/// Query parameters for listing upcoming sessions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpcomingSessionsParams {
    /// Organization id.
    pub organization_id: i64,
    /// Headquarters id.
    pub headquarters_id: i64,
}
