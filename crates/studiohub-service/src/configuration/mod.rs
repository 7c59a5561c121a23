//! Configuration resolution.

pub mod resolver;

pub use resolver::ConfigurationResolver;
