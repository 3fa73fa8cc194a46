//! Adapters for the Coupon Registry.

pub mod random;

pub use random::{FixedRandomSource, ThreadRandomSource};
