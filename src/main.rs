//! StudioHub Server — capacity and reservation engine for class bookings.
//!
//! Main entry point that wires all crates together and starts the server.

use std::sync::Arc;

use tracing_subscriber::{EnvFilter, fmt};

use studiohub_api::AppState;
use studiohub_core::config::AppConfig;
use studiohub_core::error::AppError;
use studiohub_worker::CronScheduler;
use studiohub_worker::jobs::{GenerationJob, PackageExpiryJob};

#[tokio::main]
async fn main() {
    let env = std::env::var("STUDIOHUB_ENV").unwrap_or_else(|_| "development".to_string());
    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
        _ => {
            fmt().pretty().with_env_filter(filter).with_target(true).init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting StudioHub v{}", env!("CARGO_PKG_VERSION"));

    tracing::info!("Connecting to database...");
    let db = studiohub_database::connection::DatabasePool::connect(&config.database).await?;

    tracing::info!("Running database migrations...");
    studiohub_database::migration::run_migrations(db.pool()).await?;
    tracing::info!("Database migrations complete");

    let config = Arc::new(config);
    let state = AppState::new(config.clone(), db.into_pool());

    let mut scheduler = if config.worker.enabled {
        tracing::info!("Starting background scheduler...");
        let generation = Arc::new(GenerationJob::new(state.generator.clone()));
        let package_expiry = Arc::new(PackageExpiryJob::new(state.package_repo.clone()));
        let scheduler =
            CronScheduler::new(config.worker.clone(), generation, package_expiry).await?;
        scheduler.register_default_tasks().await?;
        scheduler.start().await?;
        Some(scheduler)
    } else {
        tracing::info!("Background scheduler disabled");
        None
    };

    let app = studiohub_api::build_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {}: {}", addr, e)))?;

    tracing::info!("StudioHub server listening on {}", addr);

    let server = axum::serve(listener, app).with_graceful_shutdown(async {
        shutdown_signal().await;
        tracing::info!("Shutdown signal received, starting graceful shutdown...");
    });

    server
        .await
        .map_err(|e| AppError::internal(format!("Server error: {}", e)))?;

    if let Some(scheduler) = scheduler.as_mut() {
        scheduler.shutdown().await?;
    }

    tracing::info!("StudioHub server shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
