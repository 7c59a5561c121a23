//! Configuration override repository implementation.

use sqlx::PgPool;

use studiohub_core::error::{AppError, ErrorKind};
use studiohub_core::result::AppResult;
use studiohub_entity::configuration::{ConfigScope, ConfigurationOverride, OverrideFields};

/// Repository for per-scope configuration overrides.
#[derive(Debug, Clone)]
pub struct ConfigurationRepository {
    pool: PgPool,
}

impl ConfigurationRepository {
    /// Create a new configuration repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find the override stored at a scope, if any.
    pub async fn find_by_scope(
        &self,
        scope: ConfigScope,
        scope_id: i64,
    ) -> AppResult<Option<ConfigurationOverride>> {
        sqlx::query_as::<_, ConfigurationOverride>(
            "SELECT * FROM configuration_overrides WHERE scope = $1 AND scope_id = $2",
        )
        .bind(scope)
        .bind(scope_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find override", e))
    }

    /// Insert or replace the override stored at a scope.
    pub async fn upsert(
        &self,
        scope: ConfigScope,
        scope_id: i64,
        fields: &OverrideFields,
    ) -> AppResult<ConfigurationOverride> {
        sqlx::query_as::<_, ConfigurationOverride>(
            "INSERT INTO configuration_overrides \
             (scope, scope_id, max_participants, waitlist_enabled, waitlist_max_size, \
              waitlist_strategy, cancellation_min_hours_before_start, cancellation_allow_late_cancel) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             ON CONFLICT ON CONSTRAINT uq_configuration_overrides_scope DO UPDATE SET \
                max_participants = EXCLUDED.max_participants, \
                waitlist_enabled = EXCLUDED.waitlist_enabled, \
                waitlist_max_size = EXCLUDED.waitlist_max_size, \
                waitlist_strategy = EXCLUDED.waitlist_strategy, \
                cancellation_min_hours_before_start = EXCLUDED.cancellation_min_hours_before_start, \
                cancellation_allow_late_cancel = EXCLUDED.cancellation_allow_late_cancel, \
                updated_at = NOW() \
             RETURNING *",
        )
        .bind(scope)
        .bind(scope_id)
        .bind(fields.max_participants)
        .bind(fields.waitlist_enabled)
        .bind(fields.waitlist_max_size)
        .bind(fields.waitlist_strategy)
        .bind(fields.cancellation_min_hours_before_start)
        .bind(fields.cancellation_allow_late_cancel)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to upsert override", e))
    }

    /// Delete the override stored at a scope.
    pub async fn delete(&self, scope: ConfigScope, scope_id: i64) -> AppResult<bool> {
        let result =
            sqlx::query("DELETE FROM configuration_overrides WHERE scope = $1 AND scope_id = $2")
                .bind(scope)
                .bind(scope_id)
                .execute(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to delete override", e)
                })?;
        Ok(result.rows_affected() > 0)
    }
}
