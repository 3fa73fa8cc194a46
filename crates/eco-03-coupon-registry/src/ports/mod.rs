//! Ports for the Coupon Registry.

pub mod inbound;
pub mod outbound;

pub use inbound::CouponRegistryApi;
pub use outbound::RandomSource;
