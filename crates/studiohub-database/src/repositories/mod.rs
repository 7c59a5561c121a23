//! Concrete repository implementations.

pub mod booking;
pub mod configuration;
pub mod package;
pub mod schedule;
pub mod session;

pub use booking::BookingRepository;
pub use configuration::ConfigurationRepository;
pub use package::PackageRepository;
pub use schedule::ScheduleRepository;
pub use session::SessionRepository;
