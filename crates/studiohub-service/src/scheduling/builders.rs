//! Slot builders: expand schedule templates into concrete time slots.

use chrono::{DateTime, Days, NaiveDate, Utc};

use studiohub_entity::schedule::{Schedule, ScheduleKind};

/// One concrete `(starts_at, ends_at)` occurrence produced by a builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    /// When the generated session starts.
    pub starts_at: DateTime<Utc>,
    /// When the generated session ends.
    pub ends_at: DateTime<Utc>,
}

/// Expands one kind of schedule into slots for a target week.
///
/// Builders are registered in a [`SlotBuilderRegistry`] and selected by
/// `supports`, so adding a schedule kind means adding a builder rather
/// than growing a type-switch inside the generator.
pub trait SlotBuilder: Send + Sync {
    /// Whether this builder handles the given schedule.
    fn supports(&self, schedule: &Schedule) -> bool;

    /// Produce the slots falling inside the week starting at `week_start`
    /// (a Monday; the week runs seven days).
    fn build_slots(&self, schedule: &Schedule, week_start: NaiveDate) -> Vec<Slot>;
}

/// Combine a date with the schedule's start/end times into a slot.
fn slot_on(schedule: &Schedule, date: NaiveDate) -> Slot {
    Slot {
        starts_at: date.and_time(schedule.start_time).and_utc(),
        ends_at: date.and_time(schedule.end_time).and_utc(),
    }
}

/// Emits one slot per configured weekday that falls within the schedule's
/// `[active_from, active_until]` range (inclusive; unbounded when absent).
#[derive(Debug, Default)]
pub struct WeeklyRangeBuilder;

impl SlotBuilder for WeeklyRangeBuilder {
    fn supports(&self, schedule: &Schedule) -> bool {
        schedule.kind == ScheduleKind::WeeklyRange
    }

    fn build_slots(&self, schedule: &Schedule, week_start: NaiveDate) -> Vec<Slot> {
        // week_start is a Monday, so the day offset equals chrono's
        // num_days_from_monday weekday number.
        (0u64..7)
            .filter(|offset| schedule.weekdays.contains(&(*offset as i16)))
            .filter_map(|offset| week_start.checked_add_days(Days::new(offset)))
            .filter(|date| schedule.active_from.is_none_or(|from| *date >= from))
            .filter(|date| schedule.active_until.is_none_or(|until| *date <= until))
            .map(|date| slot_on(schedule, date))
            .collect()
    }
}

/// Emits a single slot, only when the scheduled date falls inside the
/// target week.
#[derive(Debug, Default)]
pub struct OneTimeDisposableBuilder;

impl SlotBuilder for OneTimeDisposableBuilder {
    fn supports(&self, schedule: &Schedule) -> bool {
        schedule.kind == ScheduleKind::OneTimeDisposable
    }

    fn build_slots(&self, schedule: &Schedule, week_start: NaiveDate) -> Vec<Slot> {
        let Some(date) = schedule.scheduled_date else {
            return Vec::new();
        };
        let Some(week_end) = week_start.checked_add_days(Days::new(6)) else {
            return Vec::new();
        };
        if date < week_start || date > week_end {
            return Vec::new();
        }
        vec![slot_on(schedule, date)]
    }
}

/// Ordered list of slot builders, searched first-match-wins.
pub struct SlotBuilderRegistry {
    builders: Vec<Box<dyn SlotBuilder>>,
}

impl Default for SlotBuilderRegistry {
    fn default() -> Self {
        Self {
            builders: vec![
                Box::new(WeeklyRangeBuilder),
                Box::new(OneTimeDisposableBuilder),
            ],
        }
    }
}

impl std::fmt::Debug for SlotBuilderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SlotBuilderRegistry")
            .field("builders", &self.builders.len())
            .finish()
    }
}

impl SlotBuilderRegistry {
    /// Find the first builder supporting a schedule.
    pub fn resolve(&self, schedule: &Schedule) -> Option<&dyn SlotBuilder> {
        self.builders
            .iter()
            .find(|b| b.supports(schedule))
            .map(|b| b.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    fn weekly(weekdays: Vec<i16>) -> Schedule {
        Schedule {
            id: 1,
            organization_id: 1,
            headquarters_id: 1,
            activity_id: 1,
            kind: ScheduleKind::WeeklyRange,
            weekdays,
            start_time: NaiveTime::from_hms_opt(18, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(19, 0, 0).unwrap(),
            active_from: None,
            active_until: None,
            scheduled_date: None,
            active: true,
            created_at: Utc::now(),
        }
    }

    fn one_time(date: NaiveDate) -> Schedule {
        Schedule {
            kind: ScheduleKind::OneTimeDisposable,
            weekdays: vec![],
            scheduled_date: Some(date),
            ..weekly(vec![])
        }
    }

    // Monday 2026-08-31.
    fn week_start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 31).unwrap()
    }

    #[test]
    fn test_weekly_emits_configured_weekdays() {
        // Monday and Thursday.
        let slots = WeeklyRangeBuilder.build_slots(&weekly(vec![0, 3]), week_start());
        assert_eq!(slots.len(), 2);
        assert_eq!(
            slots[0].starts_at,
            NaiveDate::from_ymd_opt(2026, 8, 31)
                .unwrap()
                .and_hms_opt(18, 0, 0)
                .unwrap()
                .and_utc()
        );
        assert_eq!(
            slots[1].starts_at.date_naive(),
            NaiveDate::from_ymd_opt(2026, 9, 3).unwrap()
        );
    }

    #[test]
    fn test_weekly_respects_active_range() {
        let mut schedule = weekly(vec![0, 3]);
        // Active range covers only Thursday onwards.
        schedule.active_from = NaiveDate::from_ymd_opt(2026, 9, 3);
        let slots = WeeklyRangeBuilder.build_slots(&schedule, week_start());
        assert_eq!(slots.len(), 1);
        assert_eq!(
            slots[0].starts_at.date_naive(),
            NaiveDate::from_ymd_opt(2026, 9, 3).unwrap()
        );

        // Bounds are inclusive.
        schedule.active_until = NaiveDate::from_ymd_opt(2026, 9, 3);
        let slots = WeeklyRangeBuilder.build_slots(&schedule, week_start());
        assert_eq!(slots.len(), 1);
    }

    #[test]
    fn test_one_time_inside_week() {
        let date = NaiveDate::from_ymd_opt(2026, 9, 2).unwrap();
        let slots = OneTimeDisposableBuilder.build_slots(&one_time(date), week_start());
        assert_eq!(slots.len(), 1);
        assert_eq!(slots[0].starts_at.date_naive(), date);
    }

    #[test]
    fn test_one_time_outside_week() {
        let date = NaiveDate::from_ymd_opt(2026, 9, 9).unwrap();
        let slots = OneTimeDisposableBuilder.build_slots(&one_time(date), week_start());
        assert!(slots.is_empty());
    }

    #[test]
    fn test_registry_dispatches_by_kind() {
        let registry = SlotBuilderRegistry::default();
        let weekly_schedule = weekly(vec![0]);
        let one_time_schedule = one_time(week_start());

        assert!(registry.resolve(&weekly_schedule).is_some());
        assert!(
            registry
                .resolve(&weekly_schedule)
                .unwrap()
                .supports(&weekly_schedule)
        );
        assert!(
            registry
                .resolve(&one_time_schedule)
                .unwrap()
                .supports(&one_time_schedule)
        );
    }
}
