//! Session entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::configuration::EffectiveConfiguration;

use super::status::{SessionSource, SessionStatus};

/// A scheduled, capacity-limited occurrence of an activity.
///
/// Sessions carry a *stamped* copy of the effective configuration that was
/// resolved when they were created. Later configuration changes do not
/// retroactively alter existing sessions. The natural key
/// `(organization_id, headquarters_id, activity_id, starts_at)` is unique,
/// which is what makes template generation idempotent.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Session {
    /// Unique session identifier.
    pub id: i64,
    /// Owning organization.
    pub organization_id: i64,
    /// Headquarters (gym location) the session runs at.
    pub headquarters_id: i64,
    /// The activity being held.
    pub activity_id: i64,
    /// When the session starts.
    pub starts_at: DateTime<Utc>,
    /// When the session ends.
    pub ends_at: DateTime<Utc>,
    /// Lifecycle status.
    pub status: SessionStatus,
    /// Whether the session was created manually or by the scheduler.
    pub source: SessionSource,

    // -- Stamped effective configuration --
    /// Maximum confirmed participants.
    pub max_participants: i32,
    /// Whether the waitlist is enabled.
    pub waitlist_enabled: bool,
    /// Maximum waitlisted bookings.
    pub waitlist_max_size: i32,
    /// Waitlist promotion strategy.
    pub waitlist_strategy: crate::configuration::WaitlistStrategy,
    /// Minimum hours before start for a free cancellation.
    pub cancellation_min_hours_before_start: i32,
    /// Whether cancelling inside the window is allowed at all.
    pub cancellation_allow_late_cancel: bool,

    /// When the session row was created.
    pub created_at: DateTime<Utc>,
}

impl Session {
    /// Check whether the session accepts bookings.
    pub fn is_open(&self) -> bool {
        self.status == SessionStatus::Open
    }

    /// Reassemble the stamped configuration as a value object.
    pub fn stamped_configuration(&self) -> EffectiveConfiguration {
        EffectiveConfiguration {
            max_participants: self.max_participants,
            waitlist_enabled: self.waitlist_enabled,
            waitlist_max_size: self.waitlist_max_size,
            waitlist_strategy: self.waitlist_strategy,
            cancellation_min_hours_before_start: self.cancellation_min_hours_before_start,
            cancellation_allow_late_cancel: self.cancellation_allow_late_cancel,
        }
    }

    /// Check whether `at` falls inside the stamped cancellation window.
    pub fn in_cancellation_window(&self, at: DateTime<Utc>) -> bool {
        let window = chrono::Duration::hours(self.cancellation_min_hours_before_start as i64);
        at > self.starts_at - window
    }
}

/// Data required to create a new session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSession {
    /// Owning organization.
    pub organization_id: i64,
    /// Headquarters the session runs at.
    pub headquarters_id: i64,
    /// The activity being held.
    pub activity_id: i64,
    /// When the session starts.
    pub starts_at: DateTime<Utc>,
    /// When the session ends.
    pub ends_at: DateTime<Utc>,
    /// Whether the session was created manually or by the scheduler.
    pub source: SessionSource,
    /// Effective configuration to stamp onto the session.
    pub configuration: EffectiveConfiguration,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::configuration::WaitlistStrategy;
    use chrono::Duration;

    fn session_starting_in(hours: i64, min_hours_before: i32) -> Session {
        let starts_at = Utc::now() + Duration::hours(hours);
        Session {
            id: 1,
            organization_id: 1,
            headquarters_id: 1,
            activity_id: 1,
            starts_at,
            ends_at: starts_at + Duration::hours(1),
            status: SessionStatus::Open,
            source: SessionSource::Manual,
            max_participants: 10,
            waitlist_enabled: false,
            waitlist_max_size: 0,
            waitlist_strategy: WaitlistStrategy::Fifo,
            cancellation_min_hours_before_start: min_hours_before,
            cancellation_allow_late_cancel: true,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_cancellation_window() {
        // Starts in 2 hours with a 4-hour window: we are inside it.
        assert!(session_starting_in(2, 4).in_cancellation_window(Utc::now()));
        // Starts in 10 hours with a 4-hour window: still free to cancel.
        assert!(!session_starting_in(10, 4).in_cancellation_window(Utc::now()));
        // Zero-hour window never restricts.
        assert!(!session_starting_in(2, 0).in_cancellation_window(Utc::now()));
    }
}
