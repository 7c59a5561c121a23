//! # studiohub-database
//!
//! PostgreSQL connection management and concrete repository
//! implementations for all StudioHub entities.
//!
//! The contended queries (session admission, credit mutation) exist in
//! transaction-scoped variants taking a `&mut PgConnection`, so that
//! services can hold a `SELECT ... FOR UPDATE` row lock across the whole
//! read-then-decide-then-write sequence.

pub mod connection;
pub mod migration;
pub mod repositories;

pub use connection::DatabasePool;
