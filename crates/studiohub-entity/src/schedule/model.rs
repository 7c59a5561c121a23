//! Schedule template entity model.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;

/// The kind of schedule template, selecting which slot builder applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "schedule_kind", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ScheduleKind {
    /// Repeats on configured weekdays within an optional active range.
    WeeklyRange,
    /// Fires once, on a single calendar date.
    OneTimeDisposable,
}

impl fmt::Display for ScheduleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WeeklyRange => write!(f, "weekly_range"),
            Self::OneTimeDisposable => write!(f, "one_time_disposable"),
        }
    }
}

/// A recurring or one-off schedule definition.
///
/// The generation run expands active schedules into concrete session rows
/// for a target week. Weekday numbers follow chrono's
/// `num_days_from_monday`: 0 = Monday .. 6 = Sunday.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Schedule {
    /// Unique schedule identifier.
    pub id: i64,
    /// Owning organization.
    pub organization_id: i64,
    /// Headquarters the generated sessions run at.
    pub headquarters_id: i64,
    /// The activity being scheduled.
    pub activity_id: i64,
    /// Which slot builder applies.
    pub kind: ScheduleKind,
    /// Weekdays the session repeats on (weekly_range only).
    pub weekdays: Vec<i16>,
    /// Time of day the session starts.
    pub start_time: NaiveTime,
    /// Time of day the session ends.
    pub end_time: NaiveTime,
    /// First date the schedule is in effect (weekly_range; None = unbounded).
    pub active_from: Option<NaiveDate>,
    /// Last date the schedule is in effect (weekly_range; None = unbounded).
    pub active_until: Option<NaiveDate>,
    /// The single date to fire on (one_time_disposable only).
    pub scheduled_date: Option<NaiveDate>,
    /// Whether the schedule participates in generation runs.
    pub active: bool,
    /// When the schedule was created.
    pub created_at: DateTime<Utc>,
}
