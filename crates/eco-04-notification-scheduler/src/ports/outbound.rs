//! # Outbound Ports

use shared_types::{CouponNotice, RewardGranted};
use thiserror::Error;

/// The registry could not produce the reward coupon.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("coupon issue failed: {message}")]
pub struct IssueFailed {
    pub message: String,
}

/// Coupon registry as seen by the scheduler.
///
/// Must be idempotent per source challenge: delivering a coupon unlock more
/// than once never creates a second coupon.
pub trait CouponIssuer: Send + Sync {
    fn issue_for_reward(&self, reward: &RewardGranted) -> Result<CouponNotice, IssueFailed>;
}
