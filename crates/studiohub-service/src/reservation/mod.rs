//! Reservation engine: admission, waitlisting, cancellation, promotion.

pub mod admission;
pub mod engine;

pub use engine::{CancelOutcome, ReservationEngine};
