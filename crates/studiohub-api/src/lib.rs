//! # studiohub-api
//!
//! Thin HTTP surface over the reservation core. Authentication and user
//! identity live outside this service; callers are trusted to have
//! validated the user and supply ids directly.

pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod router;
pub mod state;

pub use router::build_router;
pub use state::AppState;
