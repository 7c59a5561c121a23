//! Cron scheduler for periodic background tasks.

use std::sync::Arc;

use tokio_cron_scheduler::{Job as CronJob, JobScheduler};
use tracing;

use studiohub_core::config::WorkerConfig;
use studiohub_core::error::AppError;

use crate::jobs::{GenerationJob, PackageExpiryJob};

/// Cron-based scheduler for periodic background tasks.
pub struct CronScheduler {
    /// The underlying job scheduler.
    scheduler: JobScheduler,
    /// Worker configuration (cron expressions).
    config: WorkerConfig,
    /// Session generation job.
    generation: Arc<GenerationJob>,
    /// Package expiry job.
    package_expiry: Arc<PackageExpiryJob>,
}

impl std::fmt::Debug for CronScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CronScheduler").finish()
    }
}

impl CronScheduler {
    /// Create a new cron scheduler.
    pub async fn new(
        config: WorkerConfig,
        generation: Arc<GenerationJob>,
        package_expiry: Arc<PackageExpiryJob>,
    ) -> Result<Self, AppError> {
        let scheduler = JobScheduler::new()
            .await
            .map_err(|e| AppError::internal(format!("Failed to create scheduler: {}", e)))?;

        Ok(Self {
            scheduler,
            config,
            generation,
            package_expiry,
        })
    }

    /// Register all default scheduled tasks.
    pub async fn register_default_tasks(&self) -> Result<(), AppError> {
        self.register_session_generation().await?;
        self.register_package_expiry().await?;

        tracing::info!("All scheduled tasks registered");
        Ok(())
    }

    /// Start the scheduler.
    pub async fn start(&self) -> Result<(), AppError> {
        self.scheduler
            .start()
            .await
            .map_err(|e| AppError::internal(format!("Failed to start scheduler: {}", e)))?;

        tracing::info!("Cron scheduler started");
        Ok(())
    }

    /// Shutdown the scheduler.
    pub async fn shutdown(&mut self) -> Result<(), AppError> {
        self.scheduler
            .shutdown()
            .await
            .map_err(|e| AppError::internal(format!("Failed to shutdown scheduler: {}", e)))?;

        tracing::info!("Cron scheduler shut down");
        Ok(())
    }

    /// Session generation — weekly, cron from config.
    async fn register_session_generation(&self) -> Result<(), AppError> {
        let job = Arc::clone(&self.generation);
        let cron_job = CronJob::new_async(self.config.generation_cron.as_str(), move |_uuid, _lock| {
            let job = Arc::clone(&job);
            Box::pin(async move {
                if let Err(e) = job.run().await {
                    tracing::error!("Session generation failed: {}", e);
                }
            })
        })
        .map_err(|e| {
            AppError::internal(format!("Failed to create session_generation schedule: {}", e))
        })?;

        self.scheduler.add(cron_job).await.map_err(|e| {
            AppError::internal(format!("Failed to add session_generation schedule: {}", e))
        })?;

        tracing::info!(
            cron = %self.config.generation_cron,
            "Registered: session_generation"
        );
        Ok(())
    }

    /// Package expiry sweep — daily, cron from config.
    async fn register_package_expiry(&self) -> Result<(), AppError> {
        let job = Arc::clone(&self.package_expiry);
        let cron_job =
            CronJob::new_async(self.config.package_expiry_cron.as_str(), move |_uuid, _lock| {
                let job = Arc::clone(&job);
                Box::pin(async move {
                    if let Err(e) = job.run().await {
                        tracing::error!("Package expiry sweep failed: {}", e);
                    }
                })
            })
            .map_err(|e| {
                AppError::internal(format!("Failed to create package_expiry schedule: {}", e))
            })?;

        self.scheduler.add(cron_job).await.map_err(|e| {
            AppError::internal(format!("Failed to add package_expiry schedule: {}", e))
        })?;

        tracing::info!(
            cron = %self.config.package_expiry_cron,
            "Registered: package_expiry"
        );
        Ok(())
    }
}
