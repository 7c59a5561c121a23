//! Configuration override and effective configuration models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;

use studiohub_core::AppResult;
use studiohub_core::error::AppError;

use super::scope::ConfigScope;

/// Ordering strategy for waitlist promotion.
///
/// Only FIFO is currently defined; the field exists so additional
/// strategies can be introduced without a schema change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "waitlist_strategy", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum WaitlistStrategy {
    /// Oldest waitlisted booking is promoted first.
    Fifo,
}

impl fmt::Display for WaitlistStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fifo => write!(f, "fifo"),
        }
    }
}

/// A sparse configuration override stored at one scope.
///
/// Every field is optional; `None` means "inherit from the parent scope".
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ConfigurationOverride {
    /// Unique override identifier.
    pub id: i64,
    /// The scope this override applies at.
    pub scope: ConfigScope,
    /// The entity the override is attached to (org, HQ, activity, or
    /// session id, depending on `scope`).
    pub scope_id: i64,
    /// Maximum confirmed participants.
    pub max_participants: Option<i32>,
    /// Whether the waitlist is enabled.
    pub waitlist_enabled: Option<bool>,
    /// Maximum waitlisted bookings.
    pub waitlist_max_size: Option<i32>,
    /// Waitlist promotion strategy.
    pub waitlist_strategy: Option<WaitlistStrategy>,
    /// Minimum hours before session start for a free cancellation.
    pub cancellation_min_hours_before_start: Option<i32>,
    /// Whether cancelling inside the window is allowed at all.
    pub cancellation_allow_late_cancel: Option<bool>,
    /// When the override was created.
    pub created_at: DateTime<Utc>,
    /// When the override was last updated.
    pub updated_at: DateTime<Utc>,
}

/// The override fields alone, without row identity. Used both as the
/// write payload for overrides and as the merge input during resolution.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OverrideFields {
    /// Maximum confirmed participants.
    pub max_participants: Option<i32>,
    /// Whether the waitlist is enabled.
    pub waitlist_enabled: Option<bool>,
    /// Maximum waitlisted bookings.
    pub waitlist_max_size: Option<i32>,
    /// Waitlist promotion strategy.
    pub waitlist_strategy: Option<WaitlistStrategy>,
    /// Minimum hours before session start for a free cancellation.
    pub cancellation_min_hours_before_start: Option<i32>,
    /// Whether cancelling inside the window is allowed at all.
    pub cancellation_allow_late_cancel: Option<bool>,
}

impl OverrideFields {
    /// Validate an override before storage.
    ///
    /// Rules: `max_participants > 0` if set; `waitlist_max_size >= 0` if
    /// set; enabling the waitlist while explicitly setting its size to
    /// zero is rejected rather than resolved by guesswork later.
    pub fn validate(&self) -> AppResult<()> {
        if let Some(max) = self.max_participants {
            if max <= 0 {
                return Err(AppError::validation("max_participants must be positive"));
            }
        }
        if let Some(size) = self.waitlist_max_size {
            if size < 0 {
                return Err(AppError::validation("waitlist_max_size must not be negative"));
            }
        }
        if self.waitlist_enabled == Some(true) && self.waitlist_max_size == Some(0) {
            return Err(AppError::validation(
                "waitlist_max_size must be non-zero when the waitlist is enabled",
            ));
        }
        Ok(())
    }

    /// Normalize an override before storage: a waitlist enabled without an
    /// explicit strategy defaults to FIFO.
    pub fn normalized(mut self) -> Self {
        if self.waitlist_enabled == Some(true) && self.waitlist_strategy.is_none() {
            self.waitlist_strategy = Some(WaitlistStrategy::Fifo);
        }
        self
    }
}

impl ConfigurationOverride {
    /// Borrow the override fields for merging.
    pub fn fields(&self) -> OverrideFields {
        OverrideFields {
            max_participants: self.max_participants,
            waitlist_enabled: self.waitlist_enabled,
            waitlist_max_size: self.waitlist_max_size,
            waitlist_strategy: self.waitlist_strategy,
            cancellation_min_hours_before_start: self.cancellation_min_hours_before_start,
            cancellation_allow_late_cancel: self.cancellation_allow_late_cancel,
        }
    }
}

/// The fully merged session configuration.
///
/// Never persisted as such; sessions stamp a copy of these fields at
/// creation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectiveConfiguration {
    /// Maximum confirmed participants.
    pub max_participants: i32,
    /// Whether the waitlist is enabled.
    pub waitlist_enabled: bool,
    /// Maximum waitlisted bookings.
    pub waitlist_max_size: i32,
    /// Waitlist promotion strategy.
    pub waitlist_strategy: WaitlistStrategy,
    /// Minimum hours before session start for a free cancellation.
    pub cancellation_min_hours_before_start: i32,
    /// Whether cancelling inside the window is allowed at all.
    pub cancellation_allow_late_cancel: bool,
}

impl Default for EffectiveConfiguration {
    fn default() -> Self {
        Self {
            max_participants: 1,
            waitlist_enabled: false,
            waitlist_max_size: 0,
            waitlist_strategy: WaitlistStrategy::Fifo,
            cancellation_min_hours_before_start: 0,
            cancellation_allow_late_cancel: true,
        }
    }
}

impl EffectiveConfiguration {
    /// Return a copy with the non-`None` fields of `ov` applied on top.
    ///
    /// The receiver is never mutated; resolution folds this over the scope
    /// chain (organization, headquarters, activity, session).
    pub fn merge_with(&self, ov: &OverrideFields) -> Self {
        Self {
            max_participants: ov.max_participants.unwrap_or(self.max_participants),
            waitlist_enabled: ov.waitlist_enabled.unwrap_or(self.waitlist_enabled),
            waitlist_max_size: ov.waitlist_max_size.unwrap_or(self.waitlist_max_size),
            waitlist_strategy: ov.waitlist_strategy.unwrap_or(self.waitlist_strategy),
            cancellation_min_hours_before_start: ov
                .cancellation_min_hours_before_start
                .unwrap_or(self.cancellation_min_hours_before_start),
            cancellation_allow_late_cancel: ov
                .cancellation_allow_late_cancel
                .unwrap_or(self.cancellation_allow_late_cancel),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = EffectiveConfiguration::default();
        assert_eq!(cfg.max_participants, 1);
        assert!(!cfg.waitlist_enabled);
        assert_eq!(cfg.waitlist_max_size, 0);
        assert_eq!(cfg.waitlist_strategy, WaitlistStrategy::Fifo);
        assert_eq!(cfg.cancellation_min_hours_before_start, 0);
        assert!(cfg.cancellation_allow_late_cancel);
    }

    #[test]
    fn test_merge_replaces_only_set_fields() {
        let base = EffectiveConfiguration::default();
        let merged = base.merge_with(&OverrideFields {
            max_participants: Some(12),
            ..Default::default()
        });
        assert_eq!(merged.max_participants, 12);
        assert!(!merged.waitlist_enabled);
        // The source is untouched.
        assert_eq!(base.max_participants, 1);
    }

    #[test]
    fn test_four_level_inheritance() {
        let org = OverrideFields {
            max_participants: Some(20),
            ..Default::default()
        };
        let hq = OverrideFields {
            waitlist_enabled: Some(true),
            waitlist_max_size: Some(5),
            ..Default::default()
        };
        let activity = OverrideFields {
            max_participants: Some(12),
            ..Default::default()
        };
        let session = OverrideFields {
            max_participants: Some(9),
            ..Default::default()
        };

        let resolved = EffectiveConfiguration::default()
            .merge_with(&org)
            .merge_with(&hq)
            .merge_with(&activity)
            .merge_with(&session);

        assert_eq!(resolved.max_participants, 9);
        assert!(resolved.waitlist_enabled);
        assert_eq!(resolved.waitlist_max_size, 5);
    }

    #[test]
    fn test_validate_rejects_zero_max_participants() {
        let ov = OverrideFields {
            max_participants: Some(0),
            ..Default::default()
        };
        assert!(ov.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_enabled_waitlist_with_zero_size() {
        let ov = OverrideFields {
            waitlist_enabled: Some(true),
            waitlist_max_size: Some(0),
            ..Default::default()
        };
        assert!(ov.validate().is_err());
    }

    #[test]
    fn test_normalize_defaults_strategy() {
        let ov = OverrideFields {
            waitlist_enabled: Some(true),
            waitlist_max_size: Some(3),
            ..Default::default()
        }
        .normalized();
        assert_eq!(ov.waitlist_strategy, Some(WaitlistStrategy::Fifo));
    }
}
