//! # studiohub-entity
//!
//! Domain entity models for StudioHub: sessions, bookings, client
//! packages, configuration overrides, and schedule templates. Structs
//! derive `sqlx::FromRow` for direct row mapping and `serde` traits for
//! the API layer.

pub mod booking;
pub mod configuration;
pub mod package;
pub mod schedule;
pub mod session;

pub use booking::{Booking, BookingStatus, CreateBooking};
pub use configuration::{
    ConfigScope, ConfigurationOverride, EffectiveConfiguration, OverrideFields, WaitlistStrategy,
};
pub use package::{ClientPackage, ClientPackageCredit, CreatePackage};
pub use schedule::{Schedule, ScheduleKind};
pub use session::{CreateSession, Session, SessionSource, SessionStatus};
