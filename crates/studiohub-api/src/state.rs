//! Application state shared across all handlers.

use std::sync::Arc;

use sqlx::PgPool;

use studiohub_core::config::AppConfig;
use studiohub_database::repositories::booking::BookingRepository;
use studiohub_database::repositories::configuration::ConfigurationRepository;
use studiohub_database::repositories::package::PackageRepository;
use studiohub_database::repositories::schedule::ScheduleRepository;
use studiohub_database::repositories::session::SessionRepository;
use studiohub_service::configuration::resolver::ConfigurationResolver;
use studiohub_service::credit::ledger::CreditLedger;
use studiohub_service::reservation::engine::ReservationEngine;
use studiohub_service::scheduling::generator::SessionTemplateEngine;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// PostgreSQL connection pool
    pub db_pool: PgPool,

    /// Session repository
    pub session_repo: Arc<SessionRepository>,
    /// Booking repository
    pub booking_repo: Arc<BookingRepository>,
    /// Package repository
    pub package_repo: Arc<PackageRepository>,
    /// Configuration override repository
    pub configuration_repo: Arc<ConfigurationRepository>,
    /// Schedule repository
    pub schedule_repo: Arc<ScheduleRepository>,

    /// Booking admission and cancellation engine
    pub reservations: Arc<ReservationEngine>,
    /// Credit bookkeeping service
    pub credits: Arc<CreditLedger>,
    /// Hierarchical configuration resolver
    pub resolver: Arc<ConfigurationResolver>,
    /// Weekly session generator
    pub generator: Arc<SessionTemplateEngine>,
}

impl AppState {
    /// Wire repositories and services on top of a connected pool.
    pub fn new(config: Arc<AppConfig>, db_pool: PgPool) -> Self {
        let session_repo = Arc::new(SessionRepository::new(db_pool.clone()));
        let booking_repo = Arc::new(BookingRepository::new(db_pool.clone()));
        let package_repo = Arc::new(PackageRepository::new(db_pool.clone()));
        let configuration_repo = Arc::new(ConfigurationRepository::new(db_pool.clone()));
        let schedule_repo = Arc::new(ScheduleRepository::new(db_pool.clone()));

        let resolver = Arc::new(ConfigurationResolver::new(configuration_repo.clone()));
        let credits = Arc::new(CreditLedger::new(db_pool.clone(), package_repo.clone()));
        let reservations = Arc::new(ReservationEngine::new(
            db_pool.clone(),
            session_repo.clone(),
            booking_repo.clone(),
            credits.clone(),
        ));
        let generator = Arc::new(SessionTemplateEngine::new(
            db_pool.clone(),
            schedule_repo.clone(),
            session_repo.clone(),
            resolver.clone(),
        ));

        Self {
            config,
            db_pool,
            session_repo,
            booking_repo,
            package_repo,
            configuration_repo,
            schedule_repo,
            reservations,
            credits,
            resolver,
            generator,
        }
    }
}
