//! # Domain Entities

use serde::{Deserialize, Serialize};
use shared_types::{ChallengeId, CouponId, CouponNotice, Timestamp};

/// A discount coupon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coupon {
    pub id: CouponId,
    pub brand_name: String,
    /// Display label such as "15%".
    pub discount_label: String,
    /// Globally unique redemption code.
    pub code: String,
    pub issued_at: Timestamp,
    pub valid_until: Timestamp,
    pub used: bool,
    #[serde(default)]
    pub used_at: Option<Timestamp>,
    #[serde(default)]
    pub earned_from: Option<ChallengeId>,
}

impl Coupon {
    /// Not used and still inside its validity window.
    pub fn is_active(&self, now: Timestamp) -> bool {
        !self.used && now < self.valid_until
    }

    pub fn is_expired(&self, now: Timestamp) -> bool {
        now >= self.valid_until
    }

    pub fn brand_key(&self) -> String {
        brand_key(&self.brand_name)
    }

    pub fn notice(&self) -> CouponNotice {
        CouponNotice {
            coupon_id: self.id.clone(),
            brand_name: self.brand_name.clone(),
            discount_label: self.discount_label.clone(),
            code: self.code.clone(),
            valid_until: self.valid_until,
            earned_from: self.earned_from.clone(),
        }
    }
}

/// Case-folded key used for brand lookups.
pub fn brand_key(brand: &str) -> String {
    brand.trim().to_lowercase()
}

/// Case-folded key used for code lookups.
pub fn code_key(code: &str) -> String {
    code.trim().to_uppercase()
}
