//! # Coupon Registry Subsystem
//!
//! **Subsystem ID:** 3
//! **Status:** Production-Ready
//!
//! ## Purpose
//!
//! System of record for discount coupons: issues them with globally unique
//! codes, answers brand lookups, and redeems them exactly once.
//!
//! ## Domain Invariants
//!
//! | ID | Invariant | Enforcement Location |
//! |----|-----------|---------------------|
//! | INVARIANT-1 | Codes are unique | `domain/coupon_book.rs` - `insert()`, `service.rs` - retry loop |
//! | INVARIANT-2 | `used` flips once | `domain/coupon_book.rs` - `redeem()` |
//! | INVARIANT-3 | Brand lookup excludes used and expired | `domain/entities.rs` - `is_active()` |
//! | INVARIANT-4 | One reward coupon per challenge | `domain/coupon_book.rs` - source index |
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │                  CouponRegistryService               │
//! │  ┌────────────────────┐    ┌──────────────────────┐  │
//! │  │ RwLock<CouponBook> │    │ RandomSource (port)  │  │
//! │  └────────────────────┘    └──────────────────────┘  │
//! └──────────────────────────────────────────────────────┘
//! ```

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

pub use adapters::{FixedRandomSource, ThreadRandomSource};
pub use domain::*;
pub use ports::{CouponRegistryApi, RandomSource};
pub use service::CouponRegistryService;
