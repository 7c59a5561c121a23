//! Schedule repository implementation.

use sqlx::PgPool;

use studiohub_core::error::{AppError, ErrorKind};
use studiohub_core::result::AppResult;
use studiohub_entity::schedule::Schedule;

/// Repository for schedule templates.
#[derive(Debug, Clone)]
pub struct ScheduleRepository {
    pool: PgPool,
}

impl ScheduleRepository {
    /// Create a new schedule repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a schedule by ID.
    pub async fn find_by_id(&self, id: i64) -> AppResult<Option<Schedule>> {
        sqlx::query_as::<_, Schedule>("SELECT * FROM schedules WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find schedule", e))
    }

    /// List all active schedules.
    pub async fn find_active(&self) -> AppResult<Vec<Schedule>> {
        sqlx::query_as::<_, Schedule>(
            "SELECT * FROM schedules WHERE active = TRUE ORDER BY id ASC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list schedules", e))
    }

    /// Deactivate a schedule.
    pub async fn deactivate(&self, id: i64) -> AppResult<bool> {
        let result = sqlx::query("UPDATE schedules SET active = FALSE WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to deactivate schedule", e)
            })?;
        Ok(result.rows_affected() > 0)
    }
}
