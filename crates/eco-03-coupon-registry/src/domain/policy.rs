//! # Issuance Policy
//!
//! Code format and the coupon granted for a completed challenge.

use serde::{Deserialize, Serialize};

use super::errors::CouponError;

/// Prefix of every generated code.
pub const CODE_PREFIX: &str = "ECO";

/// Random characters after the prefix. 36^6 possible codes.
pub const CODE_RANDOM_LEN: usize = 6;

/// Alphabet for the random part.
pub const CODE_ALPHABET: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Generation attempts before giving up on a free code.
pub const MAX_CODE_ATTEMPTS: u32 = 16;

/// Longest validity a reward coupon may carry (ten years).
pub const MAX_VALID_FOR_DAYS: i64 = 3650;

/// Build a code, drawing one alphabet index per character.
///
/// `draw(n)` must return a value in `0..n`; out-of-range values wrap.
pub fn code_from(mut draw: impl FnMut(usize) -> usize) -> String {
    let mut code = String::with_capacity(CODE_PREFIX.len() + CODE_RANDOM_LEN);
    code.push_str(CODE_PREFIX);
    for _ in 0..CODE_RANDOM_LEN {
        let idx = draw(CODE_ALPHABET.len()) % CODE_ALPHABET.len();
        code.push(CODE_ALPHABET[idx] as char);
    }
    code
}

/// Coupon granted when a challenge is completed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewardCouponPolicy {
    /// Brand pool; one is drawn uniformly per reward.
    pub brands: Vec<String>,
    pub discount_label: String,
    pub valid_for_days: i64,
}

impl Default for RewardCouponPolicy {
    fn default() -> Self {
        Self {
            brands: vec![
                "EcoGreen".to_string(),
                "SustainableLiving".to_string(),
                "GreenChoice".to_string(),
                "EcoFriendly Co.".to_string(),
            ],
            discount_label: "15%".to_string(),
            valid_for_days: 30,
        }
    }
}

impl RewardCouponPolicy {
    pub fn validate(&self) -> Result<(), String> {
        if self.brands.iter().all(|b| b.trim().is_empty()) {
            return Err("reward coupon brand pool is empty".to_string());
        }
        if self.discount_label.trim().is_empty() {
            return Err("reward coupon discount label is empty".to_string());
        }
        if self.valid_for_days <= 0 {
            return Err("reward coupon validity must be positive".to_string());
        }
        if self.valid_for_days > MAX_VALID_FOR_DAYS {
            return Err(format!(
                "reward coupon validity exceeds {MAX_VALID_FOR_DAYS} days"
            ));
        }
        Ok(())
    }

    /// Pick a brand from the pool. Falls back to the first default brand when
    /// the pool is empty.
    pub fn pick_brand(&self, draw: impl FnOnce(usize) -> usize) -> String {
        let pool: Vec<&String> = self.brands.iter().filter(|b| !b.trim().is_empty()).collect();
        if pool.is_empty() {
            return "EcoGreen".to_string();
        }
        pool[draw(pool.len()) % pool.len()].clone()
    }

    pub fn valid_for(&self) -> Result<chrono::Duration, CouponError> {
        chrono::Duration::try_days(self.valid_for_days).ok_or_else(|| {
            CouponError::InvalidCoupon {
                reason: format!("validity of {} days is out of range", self.valid_for_days),
            }
        })
    }
}
