//! Route definitions for the StudioHub HTTP API.
//!
//! All routes are organized by domain and mounted under `/api`. The
//! router receives `AppState` and passes it to all handlers via Axum's
//! `State` extractor.

use axum::{
    Router,
    routing::{get, post, put},
};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(booking_routes())
        .merge(session_routes())
        .merge(schedule_routes())
        .merge(package_routes())
        .merge(configuration_routes())
        .merge(health_routes());

    let cors = build_cors_layer(&state);

    Router::new()
        .nest("/api", api_routes)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Build CORS layer from configuration
fn build_cors_layer(state: &AppState) -> CorsLayer {
    use axum::http::HeaderValue;
    use tower_http::cors::Any;

    let origins = &state.config.server.cors_origins;
    if origins.iter().any(|o| o == "*") {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = origins.iter().filter_map(|o| o.parse().ok()).collect();
    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Booking create, cancel, and lookup
fn booking_routes() -> Router<AppState> {
    Router::new()
        .route("/bookings", post(handlers::booking::create_booking))
        .route("/bookings/{id}", get(handlers::booking::get_booking))
        .route(
            "/bookings/{id}/cancel",
            post(handlers::booking::cancel_booking),
        )
        .route(
            "/users/{id}/bookings",
            get(handlers::booking::list_user_bookings),
        )
}

/// Session listing, manual entry, status transitions, and on-demand
/// generation
fn session_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/sessions",
            get(handlers::session::list_sessions).post(handlers::session::create_session),
        )
        .route("/sessions/{id}", get(handlers::session::get_session))
        .route(
            "/sessions/{id}/status",
            put(handlers::session::update_session_status),
        )
        .route(
            "/sessions/generate",
            post(handlers::session::generate_sessions),
        )
}

/// Schedule listing and deactivation
fn schedule_routes() -> Router<AppState> {
    Router::new()
        .route("/schedules", get(handlers::schedule::list_schedules))
        .route(
            "/schedules/{id}/deactivate",
            post(handlers::schedule::deactivate_schedule),
        )
}

/// Package purchase, listing, and credit checks
fn package_routes() -> Router<AppState> {
    Router::new()
        .route("/packages", post(handlers::package::purchase_package))
        .route("/packages/{id}", get(handlers::package::get_package))
        .route(
            "/packages/{id}/deactivate",
            post(handlers::package::deactivate_package),
        )
        .route(
            "/users/{id}/packages",
            get(handlers::package::list_user_packages),
        )
        .route(
            "/users/{user_id}/credits/{activity_id}",
            get(handlers::package::check_credit),
        )
}

/// Configuration overrides and resolution
fn configuration_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/configurations/{scope}/{scope_id}",
            put(handlers::configuration::set_configuration)
                .delete(handlers::configuration::delete_configuration),
        )
        .route(
            "/configurations/effective",
            get(handlers::configuration::get_effective_configuration),
        )
}

/// Liveness endpoint
fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}
