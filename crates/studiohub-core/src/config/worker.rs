//! Background worker configuration.

use serde::{Deserialize, Serialize};

/// Background worker settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// Whether the cron scheduler runs at all.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Cron expression for the weekly session generation run.
    /// Default: Sundays at 18:00.
    #[serde(default = "default_generation_cron")]
    pub generation_cron: String,
    /// Cron expression for the daily package expiry sweep.
    /// Default: every day at 02:00.
    #[serde(default = "default_expiry_cron")]
    pub package_expiry_cron: String,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            generation_cron: default_generation_cron(),
            package_expiry_cron: default_expiry_cron(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_generation_cron() -> String {
    "0 0 18 * * Sun".to_string()
}

fn default_expiry_cron() -> String {
    "0 0 2 * * *".to_string()
}
