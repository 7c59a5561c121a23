//! Weekly session generation job.

use std::sync::Arc;

use tracing;

use studiohub_core::error::AppError;
use studiohub_service::scheduling::{GenerationSummary, SessionTemplateEngine};

/// Runs the session template engine for the upcoming week.
#[derive(Debug)]
pub struct GenerationJob {
    /// Template engine.
    engine: Arc<SessionTemplateEngine>,
}

impl GenerationJob {
    /// Create a new generation job.
    pub fn new(engine: Arc<SessionTemplateEngine>) -> Self {
        Self { engine }
    }

    /// Generate next week's sessions, reporting the aggregated counts.
    pub async fn run(&self) -> Result<GenerationSummary, AppError> {
        tracing::info!("Running scheduled session generation");

        let summary = self.engine.generate_next_week().await?;

        tracing::info!(
            created = summary.created,
            skipped = summary.skipped,
            failed = summary.failed,
            "Scheduled session generation finished"
        );
        Ok(summary)
    }
}
