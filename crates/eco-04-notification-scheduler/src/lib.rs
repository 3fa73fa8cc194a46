//! # Notification Scheduler Subsystem
//!
//! **Subsystem ID:** 4
//! **Status:** Production-Ready
//!
//! ## Purpose
//!
//! Choreographs the announcements that follow a reward. It owns a queue of
//! timed steps and nothing else; the ledger and the coupon registry stay the
//! systems of record.
//!
//! ## Reward Chain
//!
//! ```text
//! RewardGranted
//!   │  +coin_delay (100 ms)
//!   ▼
//! [coin-award] ──► [achievement] (only on level-up, immediately due)
//!   │  +coupon_delay (2000 ms after the previous delivery)
//!   ▼
//! [coupon-unlock] ──► CouponIssuer::issue_for_reward (idempotent)
//! ```
//!
//! ## Domain Invariants
//!
//! | ID | Invariant | Enforcement Location |
//! |----|-----------|---------------------|
//! | INVARIANT-1 | FIFO within a chain | `domain/queue.rs` - next step scheduled on delivery |
//! | INVARIANT-2 | Cancel touches announcements only | `domain/queue.rs` - `cancel()` |
//! | INVARIANT-3 | Bounded transcript | `domain/transcript.rs` |
//!
//! The host drives the scheduler by calling `step()`; this crate never spawns
//! tasks or sleeps.

pub mod domain;
pub mod ports;
pub mod service;

pub use domain::*;
pub use ports::{CouponIssuer, IssueFailed, SchedulerApi};
pub use service::NotificationSchedulerService;
