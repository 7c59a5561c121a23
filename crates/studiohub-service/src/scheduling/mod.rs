//! Schedule template expansion and session generation.

pub mod builders;
pub mod generator;

pub use builders::{OneTimeDisposableBuilder, Slot, SlotBuilder, SlotBuilderRegistry, WeeklyRangeBuilder};
pub use generator::{GenerationSummary, SessionTemplateEngine};
