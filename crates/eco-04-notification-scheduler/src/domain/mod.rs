//! # Domain Layer - Notification Scheduler

pub mod entities;
pub mod queue;
pub mod transcript;

pub use entities::*;
pub use queue::*;
pub use transcript::*;
