//! # Coupon Issuer Adapter
//!
//! Implements the scheduler's `CouponIssuer` port with the Coupon Registry's
//! idempotent reward issuance.

use std::sync::Arc;

use eco_03_coupon_registry::{CouponRegistryApi, CouponRegistryService};
use eco_04_notification_scheduler::{CouponIssuer, IssueFailed};
use shared_types::{CouponNotice, RewardGranted};

pub struct CouponIssuerAdapter {
    registry: Arc<CouponRegistryService>,
}

impl CouponIssuerAdapter {
    pub fn new(registry: Arc<CouponRegistryService>) -> Self {
        Self { registry }
    }
}

impl CouponIssuer for CouponIssuerAdapter {
    fn issue_for_reward(&self, reward: &RewardGranted) -> Result<CouponNotice, IssueFailed> {
        self.registry
            .issue_for_reward(reward)
            .map(|coupon| coupon.notice())
            .map_err(|e| IssueFailed {
                message: e.to_string(),
            })
    }
}
