//! Session configuration entities: sparse per-scope overrides and the
//! merged effective configuration.

pub mod model;
pub mod scope;

pub use model::{ConfigurationOverride, EffectiveConfiguration, OverrideFields, WaitlistStrategy};
pub use scope::ConfigScope;
