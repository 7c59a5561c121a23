//! PostgreSQL pool configuration.

use serde::{Deserialize, Serialize};

/// Connection pool settings.
///
/// Booking traffic holds short row-lock transactions, so the pool favors
/// a modest ceiling with warm spares over a large cold pool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL.
    pub url: String,
    /// Upper bound on pooled connections.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Connections kept warm when idle.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    /// Seconds to wait when acquiring a connection.
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_seconds: u64,
    /// Seconds before an idle connection is reaped.
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_seconds: u64,
}

fn default_max_connections() -> u32 {
    16
}

fn default_min_connections() -> u32 {
    2
}

fn default_connect_timeout() -> u64 {
    5
}

fn default_idle_timeout() -> u64 {
    600
}
