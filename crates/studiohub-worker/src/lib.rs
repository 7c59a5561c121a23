//! # studiohub-worker
//!
//! Cron-scheduled background tasks: the weekly session generation run and
//! the daily package expiry sweep.

pub mod jobs;
pub mod scheduler;

pub use scheduler::CronScheduler;
