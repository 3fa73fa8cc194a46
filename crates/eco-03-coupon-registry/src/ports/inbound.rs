//! # Inbound Port - CouponRegistryApi

use crate::domain::{Coupon, CouponError};
use shared_types::{ChallengeId, CouponId, RewardGranted};

/// Primary API for the Coupon Registry subsystem.
pub trait CouponRegistryApi: Send + Sync {
    /// Issue a coupon with a fresh unique code.
    ///
    /// `valid_for` may be negative, yielding an already-expired coupon.
    ///
    /// # Errors
    /// - `InvalidCoupon`: blank brand or discount label
    /// - `CodeSpaceExhausted`: no free code found
    fn issue(
        &self,
        brand_name: &str,
        discount_label: &str,
        valid_for: chrono::Duration,
        earned_from: Option<ChallengeId>,
    ) -> Result<Coupon, CouponError>;

    /// Issue the reward coupon for a completed challenge.
    ///
    /// Idempotent per source challenge: later calls return the coupon issued
    /// by the first.
    fn issue_for_reward(&self, reward: &RewardGranted) -> Result<Coupon, CouponError>;

    /// Active coupons of a brand, case-insensitive, newest first.
    fn available_for_brand(&self, brand_name: &str) -> Vec<Coupon>;

    /// Mark a coupon used.
    ///
    /// # Errors
    /// - `NotFound`
    /// - `AlreadyUsed`: no-op, the coupon stays as the first redemption left it
    /// - `Expired`
    fn redeem(&self, id: &CouponId) -> Result<Coupon, CouponError>;

    fn get(&self, id: &CouponId) -> Option<Coupon>;

    fn find_by_code(&self, code: &str) -> Option<Coupon>;

    fn list_active(&self) -> Vec<Coupon>;

    fn list_expired_or_used(&self) -> Vec<Coupon>;

    /// Every coupon in issue order.
    fn list_all(&self) -> Vec<Coupon>;
}
