//! Scheduled job implementations.

pub mod generation;
pub mod package_expiry;

pub use generation::GenerationJob;
pub use package_expiry::PackageExpiryJob;
