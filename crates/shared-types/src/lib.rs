//! # Shared Types Crate
//!
//! Entities, the clock port, and error classification shared by every reward
//! subsystem.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: Types that cross a subsystem boundary
//!   (`RewardGranted`, `CouponNotice`, identifiers) are defined here.
//! - **No Subsystem Coupling**: Subsystem crates depend on this crate and on
//!   their own ports, never on each other.
//! - **Deterministic Time**: All time reads go through `TimeSource` so tests
//!   can drive the clock.

pub mod clock;
pub mod entities;
pub mod errors;

pub use clock::*;
pub use entities::*;
pub use errors::*;
