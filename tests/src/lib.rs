//! # Eco-Rewards Test Suite
//!
//! Scenarios that exercise several subsystems together through the
//! `RewardsEngine` facade.
//!
//! ## Structure
//!
//! ```text
//! tests/
//! ├── benches/
//! │   └── reward_benchmarks.rs  # Ledger, coupon and completion hot paths
//! │
//! └── src/integration/
//!     ├── reward_flow.rs        # Completion → credit → announcements
//!     ├── coupon_lifecycle.rs   # Issue, expire, redeem, brand lookup
//!     ├── persistence.rs        # Restart from the data directory
//!     └── check_in.rs           # Daily check-in streaks
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All scenarios
//! cargo test -p eco-tests
//!
//! # One area
//! cargo test -p eco-tests integration::persistence::
//!
//! # Benchmarks
//! cargo bench -p eco-tests
//! ```

#![allow(dead_code)]

pub mod integration;
