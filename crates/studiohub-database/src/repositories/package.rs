//! Client package repository implementation.

use chrono::NaiveDate;
use sqlx::{PgConnection, PgPool};

use studiohub_core::error::{AppError, ErrorKind};
use studiohub_core::result::AppResult;
use studiohub_entity::package::{ClientPackage, ClientPackageCredit, CreatePackage};

/// Repository for client packages and their credit entries.
#[derive(Debug, Clone)]
pub struct PackageRepository {
    pool: PgPool,
}

impl PackageRepository {
    /// Create a new package repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a package by ID.
    pub async fn find_by_id(&self, id: i64) -> AppResult<Option<ClientPackage>> {
        sqlx::query_as::<_, ClientPackage>("SELECT * FROM client_packages WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find package", e))
    }

    /// List a user's active packages, earliest-expiring first.
    pub async fn find_active_by_user(&self, user_id: i64) -> AppResult<Vec<ClientPackage>> {
        sqlx::query_as::<_, ClientPackage>(
            "SELECT * FROM client_packages WHERE user_id = $1 AND active = TRUE \
             ORDER BY period_end ASC, id ASC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list packages", e))
    }

    /// List a user's active packages with a row-level write lock, so two
    /// simultaneous consumptions cannot both decrement the same last token.
    pub async fn find_active_by_user_for_update(
        &self,
        conn: &mut PgConnection,
        user_id: i64,
    ) -> AppResult<Vec<ClientPackage>> {
        sqlx::query_as::<_, ClientPackage>(
            "SELECT * FROM client_packages WHERE user_id = $1 AND active = TRUE \
             ORDER BY period_end ASC, id ASC FOR UPDATE",
        )
        .bind(user_id)
        .fetch_all(conn)
        .await
        .map_err(AppError::from)
    }

    /// Find a package by ID with a row-level write lock, validating the
    /// owner. Used by the precise-reversal refund path.
    pub async fn find_owned_for_update(
        &self,
        conn: &mut PgConnection,
        package_id: i64,
        user_id: i64,
    ) -> AppResult<Option<ClientPackage>> {
        sqlx::query_as::<_, ClientPackage>(
            "SELECT * FROM client_packages WHERE id = $1 AND user_id = $2 FOR UPDATE",
        )
        .bind(package_id)
        .bind(user_id)
        .fetch_optional(conn)
        .await
        .map_err(AppError::from)
    }

    /// Deactivate a user's packages whose period has lapsed. Returns the
    /// number of packages expired.
    pub async fn expire_lapsed_by_user(&self, user_id: i64, today: NaiveDate) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE client_packages SET active = FALSE \
             WHERE user_id = $1 AND active = TRUE AND period_end < $2",
        )
        .bind(user_id)
        .bind(today)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to expire packages", e))?;
        Ok(result.rows_affected())
    }

    /// Deactivate all lapsed packages system-wide (background sweep).
    pub async fn expire_all_lapsed(&self, today: NaiveDate) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE client_packages SET active = FALSE WHERE active = TRUE AND period_end < $1",
        )
        .bind(today)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to expire packages", e))?;
        Ok(result.rows_affected())
    }

    /// Create a package with its credit entries in one transaction.
    pub async fn create(
        &self,
        data: &CreatePackage,
        period_start: NaiveDate,
        period_end: NaiveDate,
    ) -> AppResult<ClientPackage> {
        let mut tx = self.pool.begin().await.map_err(AppError::from)?;

        let package = sqlx::query_as::<_, ClientPackage>(
            "INSERT INTO client_packages (user_id, payment_id, period_start, period_end) \
             VALUES ($1, $2, $3, $4) RETURNING *",
        )
        .bind(data.user_id)
        .bind(data.payment_id)
        .bind(period_start)
        .bind(period_end)
        .fetch_one(tx.as_mut())
        .await
        .map_err(AppError::from)?;

        for (activity_id, tokens) in &data.credits {
            sqlx::query(
                "INSERT INTO client_package_credits (package_id, activity_id, tokens) \
                 VALUES ($1, $2, $3)",
            )
            .bind(package.id)
            .bind(activity_id)
            .bind(tokens)
            .execute(tx.as_mut())
            .await
            .map_err(AppError::from)?;
        }

        tx.commit().await.map_err(AppError::from)?;
        Ok(package)
    }

    /// Explicitly deactivate a package.
    pub async fn deactivate(&self, package_id: i64) -> AppResult<bool> {
        let result = sqlx::query("UPDATE client_packages SET active = FALSE WHERE id = $1")
            .bind(package_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to deactivate package", e)
            })?;
        Ok(result.rows_affected() > 0)
    }

    /// List the credit entries of a package.
    pub async fn find_credits(&self, package_id: i64) -> AppResult<Vec<ClientPackageCredit>> {
        sqlx::query_as::<_, ClientPackageCredit>(
            "SELECT * FROM client_package_credits WHERE package_id = $1 ORDER BY id ASC",
        )
        .bind(package_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list credits", e))
    }

    /// Find a credit entry inside the caller's transaction.
    pub async fn find_credit(
        &self,
        conn: &mut PgConnection,
        package_id: i64,
        activity_id: i64,
    ) -> AppResult<Option<ClientPackageCredit>> {
        sqlx::query_as::<_, ClientPackageCredit>(
            "SELECT * FROM client_package_credits WHERE package_id = $1 AND activity_id = $2",
        )
        .bind(package_id)
        .bind(activity_id)
        .fetch_optional(conn)
        .await
        .map_err(AppError::from)
    }

    /// Decrement a credit entry by one token. Returns `false` when the
    /// entry had no tokens left (guards the `tokens >= 0` invariant).
    pub async fn decrement_credit(
        &self,
        conn: &mut PgConnection,
        credit_id: i64,
    ) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE client_package_credits SET tokens = tokens - 1 \
             WHERE id = $1 AND tokens > 0",
        )
        .bind(credit_id)
        .execute(conn)
        .await
        .map_err(AppError::from)?;
        Ok(result.rows_affected() > 0)
    }

    /// Increment (or insert) the credit entry for an activity in a package.
    /// Refunds have no upper bound.
    pub async fn increment_credit(
        &self,
        conn: &mut PgConnection,
        package_id: i64,
        activity_id: i64,
    ) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO client_package_credits (package_id, activity_id, tokens) \
             VALUES ($1, $2, 1) \
             ON CONFLICT ON CONSTRAINT uq_credits_package_activity \
             DO UPDATE SET tokens = client_package_credits.tokens + 1",
        )
        .bind(package_id)
        .bind(activity_id)
        .execute(conn)
        .await
        .map_err(AppError::from)?;
        Ok(())
    }

    /// Check whether a user has any active package with tokens left for an
    /// activity.
    pub async fn has_available_credit(&self, user_id: i64, activity_id: i64) -> AppResult<bool> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS ( \
                SELECT 1 FROM client_packages p \
                JOIN client_package_credits c ON c.package_id = p.id \
                WHERE p.user_id = $1 AND p.active = TRUE \
                  AND c.activity_id = $2 AND c.tokens > 0 \
             )",
        )
        .bind(user_id)
        .bind(activity_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to check credit", e))
    }
}
