//! Session repository implementation.

use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool};

use studiohub_core::error::{AppError, ErrorKind};
use studiohub_core::result::AppResult;
use studiohub_entity::session::{CreateSession, Session, SessionStatus};

/// Repository for session CRUD and query operations.
#[derive(Debug, Clone)]
pub struct SessionRepository {
    pool: PgPool,
}

const INSERT_SESSION: &str = "INSERT INTO sessions \
     (organization_id, headquarters_id, activity_id, starts_at, ends_at, source, \
      max_participants, waitlist_enabled, waitlist_max_size, waitlist_strategy, \
      cancellation_min_hours_before_start, cancellation_allow_late_cancel) \
     VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)";

impl SessionRepository {
    /// Create a new session repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a session by ID.
    pub async fn find_by_id(&self, id: i64) -> AppResult<Option<Session>> {
        sqlx::query_as::<_, Session>("SELECT * FROM sessions WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find session", e))
    }

    /// Find a session by ID, taking a row-level write lock.
    ///
    /// Must run inside the caller's transaction; the lock serializes every
    /// capacity-affecting operation on the same session until commit.
    pub async fn find_by_id_for_update(
        &self,
        conn: &mut PgConnection,
        id: i64,
    ) -> AppResult<Option<Session>> {
        sqlx::query_as::<_, Session>("SELECT * FROM sessions WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(conn)
            .await
            .map_err(AppError::from)
    }

    /// List upcoming sessions for a headquarters.
    pub async fn find_upcoming(
        &self,
        organization_id: i64,
        headquarters_id: i64,
        from: DateTime<Utc>,
    ) -> AppResult<Vec<Session>> {
        sqlx::query_as::<_, Session>(
            "SELECT * FROM sessions \
             WHERE organization_id = $1 AND headquarters_id = $2 AND starts_at >= $3 \
             ORDER BY starts_at ASC",
        )
        .bind(organization_id)
        .bind(headquarters_id)
        .bind(from)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list upcoming sessions", e)
        })
    }

    /// Create a session from manual entry.
    pub async fn create(&self, data: &CreateSession) -> AppResult<Session> {
        let cfg = &data.configuration;
        sqlx::query_as::<_, Session>(&format!("{INSERT_SESSION} RETURNING *"))
            .bind(data.organization_id)
            .bind(data.headquarters_id)
            .bind(data.activity_id)
            .bind(data.starts_at)
            .bind(data.ends_at)
            .bind(data.source)
            .bind(cfg.max_participants)
            .bind(cfg.waitlist_enabled)
            .bind(cfg.waitlist_max_size)
            .bind(cfg.waitlist_strategy)
            .bind(cfg.cancellation_min_hours_before_start)
            .bind(cfg.cancellation_allow_late_cancel)
            .fetch_one(&self.pool)
            .await
            // Duplicate natural keys surface as a conflict, not a 500.
            .map_err(AppError::from)
    }

    /// Insert a generated session, skipping silently when the natural key
    /// `(organization_id, headquarters_id, activity_id, starts_at)` already
    /// exists. Returns `None` on skip.
    pub async fn insert_generated(
        &self,
        conn: &mut PgConnection,
        data: &CreateSession,
    ) -> AppResult<Option<Session>> {
        let cfg = &data.configuration;
        sqlx::query_as::<_, Session>(&format!(
            "{INSERT_SESSION} \
             ON CONFLICT ON CONSTRAINT uq_sessions_natural_key DO NOTHING \
             RETURNING *"
        ))
        .bind(data.organization_id)
        .bind(data.headquarters_id)
        .bind(data.activity_id)
        .bind(data.starts_at)
        .bind(data.ends_at)
        .bind(data.source)
        .bind(cfg.max_participants)
        .bind(cfg.waitlist_enabled)
        .bind(cfg.waitlist_max_size)
        .bind(cfg.waitlist_strategy)
        .bind(cfg.cancellation_min_hours_before_start)
        .bind(cfg.cancellation_allow_late_cancel)
        .fetch_optional(conn)
        .await
        .map_err(AppError::from)
    }

    /// Update a session's status.
    pub async fn update_status(&self, id: i64, status: SessionStatus) -> AppResult<bool> {
        let result = sqlx::query("UPDATE sessions SET status = $2 WHERE id = $1")
            .bind(id)
            .bind(status)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to update session status", e)
            })?;
        Ok(result.rows_affected() > 0)
    }
}
