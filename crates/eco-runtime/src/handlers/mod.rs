//! # Host Loop Handlers
//!
//! Long-running tasks spawned by the runtime.

pub mod scheduler;

pub use scheduler::SchedulerDriver;
