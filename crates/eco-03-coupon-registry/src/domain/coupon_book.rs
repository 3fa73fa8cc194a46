//! # Coupon Book
//!
//! Coupons keyed by id, with derived indexes by brand, code, and source
//! challenge. Indexes are only touched through `insert`.

use super::entities::{brand_key, code_key, Coupon};
use super::errors::CouponError;
use shared_types::{ChallengeId, CouponId, Timestamp};
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct CouponBook {
    coupons: HashMap<CouponId, Coupon>,
    /// Insertion order.
    order: Vec<CouponId>,
    by_brand: HashMap<String, Vec<CouponId>>,
    by_code: HashMap<String, CouponId>,
    by_source: HashMap<ChallengeId, CouponId>,
}

impl CouponBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from persisted coupons, rejecting duplicate ids or codes.
    pub fn restore(coupons: Vec<Coupon>) -> Result<Self, CouponError> {
        let mut book = Self::new();
        for coupon in coupons {
            book.insert(coupon).map_err(|e| CouponError::CorruptedState {
                detail: e.to_string(),
            })?;
        }
        Ok(book)
    }

    /// Add a coupon, keeping every index consistent.
    pub fn insert(&mut self, coupon: Coupon) -> Result<(), CouponError> {
        if coupon.id.is_blank() {
            return Err(CouponError::InvalidCoupon {
                reason: "id must not be empty".to_string(),
            });
        }
        if coupon.code.trim().is_empty() {
            return Err(CouponError::InvalidCoupon {
                reason: "code must not be empty".to_string(),
            });
        }
        if self.coupons.contains_key(&coupon.id) {
            return Err(CouponError::InvalidCoupon {
                reason: format!("duplicate coupon id {}", coupon.id),
            });
        }
        let code = code_key(&coupon.code);
        if self.by_code.contains_key(&code) {
            return Err(CouponError::InvalidCoupon {
                reason: format!("duplicate coupon code {}", coupon.code),
            });
        }

        let id = coupon.id.clone();
        self.by_brand
            .entry(coupon.brand_key())
            .or_default()
            .push(id.clone());
        self.by_code.insert(code, id.clone());
        if let Some(source) = &coupon.earned_from {
            self.by_source
                .entry(source.clone())
                .or_insert_with(|| id.clone());
        }
        self.order.push(id.clone());
        self.coupons.insert(id, coupon);
        Ok(())
    }

    pub fn get(&self, id: &CouponId) -> Option<&Coupon> {
        self.coupons.get(id)
    }

    /// Case-insensitive code lookup.
    pub fn find_by_code(&self, code: &str) -> Option<&Coupon> {
        self.by_code
            .get(&code_key(code))
            .and_then(|id| self.coupons.get(id))
    }

    pub fn contains_code(&self, code: &str) -> bool {
        self.by_code.contains_key(&code_key(code))
    }

    /// Coupon already issued for a challenge, if any.
    pub fn for_source(&self, challenge: &ChallengeId) -> Option<&Coupon> {
        self.by_source
            .get(challenge)
            .and_then(|id| self.coupons.get(id))
    }

    /// Active coupons of a brand (case-insensitive), newest first.
    pub fn available_for_brand(&self, brand: &str, now: Timestamp) -> Vec<Coupon> {
        let mut found: Vec<Coupon> = self
            .by_brand
            .get(&brand_key(brand))
            .into_iter()
            .flatten()
            .filter_map(|id| self.coupons.get(id))
            .filter(|c| c.is_active(now))
            .cloned()
            .collect();
        // Stable sort keeps later insertions first among equal issue times.
        found.reverse();
        found.sort_by(|a, b| b.issued_at.cmp(&a.issued_at));
        found
    }

    /// All coupons in insertion order.
    pub fn all(&self) -> Vec<Coupon> {
        self.order
            .iter()
            .filter_map(|id| self.coupons.get(id))
            .cloned()
            .collect()
    }

    pub fn active(&self, now: Timestamp) -> Vec<Coupon> {
        self.all().into_iter().filter(|c| c.is_active(now)).collect()
    }

    pub fn expired_or_used(&self, now: Timestamp) -> Vec<Coupon> {
        self.all().into_iter().filter(|c| !c.is_active(now)).collect()
    }

    pub fn len(&self) -> usize {
        self.coupons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coupons.is_empty()
    }

    /// Mark a coupon used. Fails without side effects when it is already
    /// used or expired; used is checked first.
    pub fn redeem(&mut self, id: &CouponId, now: Timestamp) -> Result<Coupon, CouponError> {
        let coupon = self
            .coupons
            .get_mut(id)
            .ok_or_else(|| CouponError::NotFound(id.clone()))?;
        if coupon.used {
            return Err(CouponError::AlreadyUsed(id.clone()));
        }
        if coupon.is_expired(now) {
            return Err(CouponError::Expired {
                id: id.clone(),
                valid_until: coupon.valid_until,
            });
        }
        coupon.used = true;
        coupon.used_at = Some(now);
        Ok(coupon.clone())
    }
}
