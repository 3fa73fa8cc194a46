//! # Eco Runtime Library
//!
//! Wires the reward subsystems into one engine and hosts it. The binary in
//! `main.rs` is a thin shell around [`EcoRuntime`].
//!
//! ## Layout
//!
//! - `container/` - configuration and the subsystem container
//! - `adapters/` - port implementations and snapshot storage
//! - `engine/` - command/query facade ([`RewardsEngine`])
//! - `handlers/` - the scheduler driver task
//!
//! ## Reward Flow
//!
//! ```text
//! complete_challenge ──→ Quest Engine ──credit──→ Ledger
//!        │                    │
//!        │              RewardGranted
//!        │                    ├──→ Coupon Registry (issue, durable)
//!        │                    └──→ Scheduler: coin-award ─2s─→ coupon-unlock
//!        ↓
//!   snapshot saved ──→ events published on the bus
//! ```

pub mod adapters;
pub mod container;
pub mod engine;
pub mod handlers;
pub mod runtime;

pub use container::{ConfigError, EngineConfig};
pub use engine::{
    CheckInReceipt, CommandOutcome, CompletionReceipt, EngineError, NoOpReason, ProfileProgress,
    RewardsEngine,
};
pub use runtime::EcoRuntime;
pub use shared_types::Classify;
