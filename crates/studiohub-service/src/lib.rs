//! # studiohub-service
//!
//! Business logic service layer for StudioHub. Each service orchestrates
//! repositories to implement application-level use cases: configuration
//! resolution, the credit ledger, the reservation engine, and schedule
//! template expansion.
//!
//! Services follow constructor injection — all dependencies are provided
//! at construction time via `Arc` references. Concurrency correctness is
//! delegated to row-level write locks in the store, never to in-process
//! mutexes, because multiple server replicas may run concurrently.

pub mod configuration;
pub mod credit;
pub mod reservation;
pub mod scheduling;

pub use configuration::ConfigurationResolver;
pub use credit::CreditLedger;
pub use reservation::{CancelOutcome, ReservationEngine};
pub use scheduling::{GenerationSummary, SessionTemplateEngine, SlotBuilderRegistry};
