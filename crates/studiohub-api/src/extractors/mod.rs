//! Custom Axum extractors.

pub mod idempotency;

pub use idempotency::IdempotencyKey;
