//! Booking status enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle status of a booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "booking_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    /// Holds a seat against the session capacity.
    Confirmed,
    /// Queued in the overflow waitlist.
    Waitlisted,
    /// Released; no longer counts against anything.
    Cancelled,
    /// The user showed up.
    Attended,
    /// The user did not show up.
    NoShow,
}

impl BookingStatus {
    /// Whether the booking still claims a spot (confirmed or waitlisted).
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Confirmed | Self::Waitlisted)
    }

    /// Return the status as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Confirmed => "confirmed",
            Self::Waitlisted => "waitlisted",
            Self::Cancelled => "cancelled",
            Self::Attended => "attended",
            Self::NoShow => "no_show",
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for BookingStatus {
    type Err = studiohub_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "confirmed" => Ok(Self::Confirmed),
            "waitlisted" => Ok(Self::Waitlisted),
            "cancelled" => Ok(Self::Cancelled),
            "attended" => Ok(Self::Attended),
            "no_show" => Ok(Self::NoShow),
            _ => Err(studiohub_core::AppError::validation(format!(
                "Invalid booking status: '{s}'. Expected one of: confirmed, waitlisted, cancelled, attended, no_show"
            ))),
        }
    }
}
