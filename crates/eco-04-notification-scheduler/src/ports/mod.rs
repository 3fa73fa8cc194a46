//! Ports for the Notification Scheduler.

pub mod inbound;
pub mod outbound;

pub use inbound::SchedulerApi;
pub use outbound::{CouponIssuer, IssueFailed};
