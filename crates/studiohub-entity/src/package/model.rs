//! Client package entity models.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A time-bounded bundle of per-activity credits owned by a user.
///
/// Packages run for one calendar month from creation. `active` flips to
/// false lazily when `period_end` has passed, or when explicitly
/// deactivated; a user may hold several active packages at once.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ClientPackage {
    /// Unique package identifier.
    pub id: i64,
    /// Owning user.
    pub user_id: i64,
    /// The payment that purchased this package.
    pub payment_id: i64,
    /// First day of the entitlement period.
    pub period_start: NaiveDate,
    /// Last day of the entitlement period (inclusive).
    pub period_end: NaiveDate,
    /// Whether the package can still be consumed from.
    pub active: bool,
    /// When the package was created.
    pub created_at: DateTime<Utc>,
}

impl ClientPackage {
    /// The single expiry predicate shared by the lazy on-access check and
    /// the daily background sweep.
    pub fn is_expired(&self, today: NaiveDate) -> bool {
        self.period_end < today
    }
}

/// One per-activity credit entry inside a package.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ClientPackageCredit {
    /// Unique credit-entry identifier.
    pub id: i64,
    /// The package this entry belongs to.
    pub package_id: i64,
    /// The activity these tokens are valid for.
    pub activity_id: i64,
    /// Remaining consumable tokens. Never negative.
    pub tokens: i32,
}

/// Data required to create a new package.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePackage {
    /// Owning user.
    pub user_id: i64,
    /// The payment that purchased this package.
    pub payment_id: i64,
    /// Credits to load into the package, as (activity_id, tokens) pairs.
    pub credits: Vec<(i64, i32)>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn package(period_end: NaiveDate) -> ClientPackage {
        ClientPackage {
            id: 1,
            user_id: 1,
            payment_id: 1,
            period_start: period_end - chrono::Days::new(30),
            period_end,
            active: true,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_expiry_predicate() {
        let today = NaiveDate::from_ymd_opt(2026, 8, 29).unwrap();
        // Still valid on its last day.
        assert!(!package(today).is_expired(today));
        assert!(!package(today + chrono::Days::new(1)).is_expired(today));
        assert!(package(today - chrono::Days::new(1)).is_expired(today));
    }
}
