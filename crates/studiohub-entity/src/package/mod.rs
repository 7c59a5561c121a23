//! Client package domain entities.

pub mod model;

pub use model::{ClientPackage, ClientPackageCredit, CreatePackage};
