//! Session domain entities.

pub mod model;
pub mod status;

pub use model::{CreateSession, Session};
pub use status::{SessionSource, SessionStatus};
