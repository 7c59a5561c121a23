//! Daily package expiry sweep.

use std::sync::Arc;

use chrono::Utc;
use tracing;

use studiohub_core::error::AppError;
use studiohub_database::repositories::PackageRepository;

/// Deactivates all packages whose period has lapsed.
///
/// The credit ledger already expires a user's packages lazily on access;
/// this sweep catches packages of users who never come back. Both use the
/// same predicate (`period_end < today`).
#[derive(Debug)]
pub struct PackageExpiryJob {
    /// Package repository.
    package_repo: Arc<PackageRepository>,
}

impl PackageExpiryJob {
    /// Create a new package expiry job.
    pub fn new(package_repo: Arc<PackageRepository>) -> Self {
        Self { package_repo }
    }

    /// Expire all lapsed packages, returning the count.
    pub async fn run(&self) -> Result<u64, AppError> {
        tracing::info!("Running package expiry sweep");

        let expired = self
            .package_repo
            .expire_all_lapsed(Utc::now().date_naive())
            .await?;

        tracing::info!(expired, "Package expiry sweep finished");
        Ok(expired)
    }
}
