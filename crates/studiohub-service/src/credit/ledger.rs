//! Per-activity credit ledger over a user's packages.

use std::sync::Arc;

use chrono::{Months, Utc};
use sqlx::{PgConnection, PgPool};
use tracing::{debug, info};

use studiohub_core::error::AppError;
use studiohub_core::result::AppResult;
use studiohub_database::repositories::PackageRepository;
use studiohub_entity::package::{ClientPackage, CreatePackage};

use crate::configuration::resolver::require_positive;

/// No-credit rejection shown to end users.
const NO_CREDITS: &str = "User has no available credits for this activity";

/// Tracks per-activity token balances held in a user's packages.
///
/// Consumption decrements the earliest-expiring package first so tokens
/// are not stranded in a package about to lapse; refunds restore into the
/// exact package a booking consumed from when that package is known.
/// Packages past their period end are expired lazily on every access,
/// with the daily sweep sharing the same predicate.
#[derive(Debug, Clone)]
pub struct CreditLedger {
    /// Pool for the ledger's own transaction boundaries.
    pool: PgPool,
    /// Package store.
    package_repo: Arc<PackageRepository>,
}

impl CreditLedger {
    /// Create a new credit ledger.
    pub fn new(pool: PgPool, package_repo: Arc<PackageRepository>) -> Self {
        Self { pool, package_repo }
    }

    /// Lazily expire the user's lapsed packages.
    pub async fn expire_lapsed(&self, user_id: i64) -> AppResult<u64> {
        let expired = self
            .package_repo
            .expire_lapsed_by_user(user_id, Utc::now().date_naive())
            .await?;
        if expired > 0 {
            debug!(user_id, expired, "Expired lapsed packages");
        }
        Ok(expired)
    }

    /// Check whether the user holds any active package with tokens left
    /// for an activity.
    pub async fn has_available_credit(&self, user_id: i64, activity_id: i64) -> AppResult<bool> {
        require_positive(user_id, "user_id")?;
        require_positive(activity_id, "activity_id")?;
        self.expire_lapsed(user_id).await?;
        self.package_repo
            .has_available_credit(user_id, activity_id)
            .await
    }

    /// Consume one credit for an activity, returning the id of the package
    /// it was taken from.
    pub async fn consume_credit(&self, user_id: i64, activity_id: i64) -> AppResult<i64> {
        require_positive(user_id, "user_id")?;
        require_positive(activity_id, "activity_id")?;
        self.expire_lapsed(user_id).await?;

        let mut tx = self.pool.begin().await?;
        let package_id = self.consume_in(tx.as_mut(), user_id, activity_id).await?;
        tx.commit().await?;
        Ok(package_id)
    }

    /// Consume one credit inside the caller's transaction.
    ///
    /// Candidate packages are loaded with a row-level write lock in
    /// earliest-`period_end`-first order (package id as tiebreak), and the
    /// first credit entry with tokens left is decremented.
    pub async fn consume_in(
        &self,
        conn: &mut PgConnection,
        user_id: i64,
        activity_id: i64,
    ) -> AppResult<i64> {
        let mut packages = self
            .package_repo
            .find_active_by_user_for_update(conn, user_id)
            .await?;
        consumption_order(&mut packages);

        // The lazy sweep runs outside this transaction; a package can lapse
        // across a day boundary in between, so re-check the period here.
        let today = Utc::now().date_naive();
        for package in packages.iter().filter(|p| !p.is_expired(today)) {
            let Some(credit) = self
                .package_repo
                .find_credit(conn, package.id, activity_id)
                .await?
            else {
                continue;
            };
            if credit.tokens > 0 && self.package_repo.decrement_credit(conn, credit.id).await? {
                debug!(
                    user_id,
                    activity_id,
                    package_id = package.id,
                    remaining = credit.tokens - 1,
                    "Consumed credit"
                );
                return Ok(package.id);
            }
        }

        Err(AppError::conflict(NO_CREDITS))
    }

    /// Refund one credit for an activity.
    ///
    /// When `consumed_package_id` is known this is a precise reversal into
    /// that package (validated to still belong to the user); otherwise the
    /// earliest-expiring active package receives the token. Refunds have
    /// no upper bound.
    pub async fn refund_credit(
        &self,
        user_id: i64,
        activity_id: i64,
        consumed_package_id: Option<i64>,
    ) -> AppResult<()> {
        require_positive(user_id, "user_id")?;
        require_positive(activity_id, "activity_id")?;

        let mut tx = self.pool.begin().await?;
        self.refund_in(tx.as_mut(), user_id, activity_id, consumed_package_id)
            .await?;
        tx.commit().await?;
        Ok(())
    }

    /// Refund one credit inside the caller's transaction.
    pub async fn refund_in(
        &self,
        conn: &mut PgConnection,
        user_id: i64,
        activity_id: i64,
        consumed_package_id: Option<i64>,
    ) -> AppResult<()> {
        let package_id = match consumed_package_id {
            Some(package_id) => {
                let package = self
                    .package_repo
                    .find_owned_for_update(conn, package_id, user_id)
                    .await?
                    .ok_or_else(|| {
                        AppError::not_found("Package not found or not owned by this user")
                    })?;
                package.id
            }
            None => {
                let mut packages = self
                    .package_repo
                    .find_active_by_user_for_update(conn, user_id)
                    .await?;
                consumption_order(&mut packages);

                // Same earliest-expiry-first order as consumption; the
                // credit entry is inserted if the package lacks one.
                let today = Utc::now().date_naive();
                packages
                    .iter()
                    .find(|p| !p.is_expired(today))
                    .map(|p| p.id)
                    .ok_or_else(|| AppError::not_found("User has no package to refund into"))?
            }
        };

        self.package_repo
            .increment_credit(conn, package_id, activity_id)
            .await?;
        debug!(user_id, activity_id, package_id, "Refunded credit");
        Ok(())
    }

    /// Purchase a new package running one calendar month from today.
    pub async fn purchase_package(&self, data: CreatePackage) -> AppResult<ClientPackage> {
        require_positive(data.user_id, "user_id")?;
        require_positive(data.payment_id, "payment_id")?;
        for (activity_id, tokens) in &data.credits {
            require_positive(*activity_id, "activity_id")?;
            if *tokens < 0 {
                return Err(AppError::validation("tokens must not be negative"));
            }
        }

        let period_start = Utc::now().date_naive();
        let period_end = period_start
            .checked_add_months(Months::new(1))
            .ok_or_else(|| AppError::internal("Package period end out of range"))?;

        let package = self
            .package_repo
            .create(&data, period_start, period_end)
            .await?;
        info!(
            user_id = package.user_id,
            package_id = package.id,
            payment_id = package.payment_id,
            period_end = %package.period_end,
            "Package purchased"
        );
        Ok(package)
    }

    /// Explicitly deactivate a package.
    pub async fn deactivate_package(&self, package_id: i64) -> AppResult<()> {
        require_positive(package_id, "package_id")?;
        if !self.package_repo.deactivate(package_id).await? {
            return Err(AppError::not_found("Package not found"));
        }
        info!(package_id, "Package deactivated");
        Ok(())
    }
}

/// Sort packages into consumption order: earliest `period_end` first,
/// package id as tiebreak.
fn consumption_order(packages: &mut [ClientPackage]) {
    packages.sort_by(|a, b| {
        a.period_end
            .cmp(&b.period_end)
            .then_with(|| a.id.cmp(&b.id))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn package(id: i64, period_end: NaiveDate) -> ClientPackage {
        ClientPackage {
            id,
            user_id: 1,
            payment_id: 1,
            period_start: period_end - chrono::Days::new(30),
            period_end,
            active: true,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_earliest_expiring_package_first() {
        let soon = NaiveDate::from_ymd_opt(2026, 9, 1).unwrap();
        let later = NaiveDate::from_ymd_opt(2026, 9, 9).unwrap();
        let mut packages = vec![package(1, later), package(2, soon)];

        consumption_order(&mut packages);
        assert_eq!(packages[0].id, 2);
        assert_eq!(packages[1].id, 1);
    }

    #[test]
    fn test_id_breaks_period_end_ties() {
        let end = NaiveDate::from_ymd_opt(2026, 9, 1).unwrap();
        let mut packages = vec![package(7, end), package(3, end)];

        consumption_order(&mut packages);
        assert_eq!(packages[0].id, 3);
    }
}
