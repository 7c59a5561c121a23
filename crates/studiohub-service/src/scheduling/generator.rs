//! Session generation: materialize schedule templates into session rows.

use std::sync::Arc;

use chrono::{Datelike, Days, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tracing::{info, warn};

use studiohub_core::result::AppResult;
use studiohub_database::repositories::{ScheduleRepository, SessionRepository};
use studiohub_entity::schedule::Schedule;
use studiohub_entity::session::{CreateSession, SessionSource};

use crate::configuration::ConfigurationResolver;

use super::builders::SlotBuilderRegistry;

/// Aggregated result of one generation run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationSummary {
    /// Sessions inserted.
    pub created: u32,
    /// Slots whose session already existed (or lost an insert race).
    pub skipped: u32,
    /// Schedules whose generation failed entirely.
    pub failed: u32,
}

/// Expands active schedules into concrete sessions for a target week.
///
/// Each schedule is generated in its own transaction so one malformed
/// schedule cannot abort the run for the others. Inserts are idempotent on
/// the session natural key, which makes re-running a generation (or racing
/// another replica's run) report skips instead of duplicating sessions.
#[derive(Debug)]
pub struct SessionTemplateEngine {
    /// Pool for the per-schedule transaction boundaries.
    pool: PgPool,
    /// Schedule store.
    schedule_repo: Arc<ScheduleRepository>,
    /// Session store.
    session_repo: Arc<SessionRepository>,
    /// Resolver for the configuration stamped onto generated sessions.
    resolver: Arc<ConfigurationResolver>,
    /// Slot builders by schedule kind.
    registry: SlotBuilderRegistry,
}

impl SessionTemplateEngine {
    /// Create a new template engine with the default builder registry.
    pub fn new(
        pool: PgPool,
        schedule_repo: Arc<ScheduleRepository>,
        session_repo: Arc<SessionRepository>,
        resolver: Arc<ConfigurationResolver>,
    ) -> Self {
        Self {
            pool,
            schedule_repo,
            session_repo,
            resolver,
            registry: SlotBuilderRegistry::default(),
        }
    }

    /// Generate sessions for the week after the current one.
    pub async fn generate_next_week(&self) -> AppResult<GenerationSummary> {
        self.generate_for_week(next_week_start(Utc::now().date_naive()))
            .await
    }

    /// Generate sessions for the week starting at `week_start` (a Monday).
    pub async fn generate_for_week(&self, week_start: NaiveDate) -> AppResult<GenerationSummary> {
        let schedules = self.schedule_repo.find_active().await?;
        info!(
            %week_start,
            schedules = schedules.len(),
            "Starting session generation run"
        );

        let mut summary = GenerationSummary::default();
        for schedule in &schedules {
            match self.generate_schedule(schedule, week_start).await {
                Ok((created, skipped)) => {
                    summary.created += created;
                    summary.skipped += skipped;
                }
                // Isolated per schedule: count it and move on.
                Err(e) => {
                    warn!(schedule_id = schedule.id, error = %e, "Schedule generation failed");
                    summary.failed += 1;
                }
            }
        }

        info!(
            %week_start,
            created = summary.created,
            skipped = summary.skipped,
            failed = summary.failed,
            "Session generation run finished"
        );
        Ok(summary)
    }

    /// Generate one schedule's sessions inside its own transaction.
    async fn generate_schedule(
        &self,
        schedule: &Schedule,
        week_start: NaiveDate,
    ) -> AppResult<(u32, u32)> {
        let Some(builder) = self.registry.resolve(schedule) else {
            return Err(studiohub_core::AppError::internal(format!(
                "No slot builder registered for schedule kind {}",
                schedule.kind
            )));
        };
        let slots = builder.build_slots(schedule, week_start);

        // The stamped configuration is resolved once per schedule; later
        // configuration changes do not touch already-generated sessions.
        let configuration = self
            .resolver
            .resolve(
                schedule.organization_id,
                schedule.headquarters_id,
                schedule.activity_id,
                None,
            )
            .await?;

        let mut tx = self.pool.begin().await?;
        let mut created = 0u32;
        let mut skipped = 0u32;

        for slot in slots {
            // The insert absorbs natural-key collisions itself (a concurrent
            // run's row comes back as None), so any error aborts the
            // schedule's transaction.
            let inserted = self
                .session_repo
                .insert_generated(
                    tx.as_mut(),
                    &CreateSession {
                        organization_id: schedule.organization_id,
                        headquarters_id: schedule.headquarters_id,
                        activity_id: schedule.activity_id,
                        starts_at: slot.starts_at,
                        ends_at: slot.ends_at,
                        source: SessionSource::Scheduler,
                        configuration,
                    },
                )
                .await?;

            match inserted {
                Some(_) => created += 1,
                None => skipped += 1,
            }
        }

        tx.commit().await?;
        Ok((created, skipped))
    }
}

/// The Monday of the week after the one containing `today`.
fn next_week_start(today: NaiveDate) -> NaiveDate {
    let days_ahead = 7 - today.weekday().num_days_from_monday() as u64;
    today + Days::new(days_ahead)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_week_start() {
        // Saturday 2026-08-29 -> Monday 2026-08-31.
        let sat = NaiveDate::from_ymd_opt(2026, 8, 29).unwrap();
        assert_eq!(
            next_week_start(sat),
            NaiveDate::from_ymd_opt(2026, 8, 31).unwrap()
        );
        // From a Monday, the *next* Monday.
        let mon = NaiveDate::from_ymd_opt(2026, 8, 31).unwrap();
        assert_eq!(
            next_week_start(mon),
            NaiveDate::from_ymd_opt(2026, 9, 7).unwrap()
        );
    }
}
