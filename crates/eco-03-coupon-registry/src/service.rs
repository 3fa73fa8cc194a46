//! # Coupon Registry Service
//!
//! `CouponBook` behind a `RwLock`, plus code generation and the reward
//! policy. Issue-for-reward holds the write lock across the source lookup and
//! the insert, so concurrent calls for one challenge yield one coupon.

use crate::domain::{
    code_from, demo_coupons, Coupon, CouponBook, CouponError, RewardCouponPolicy,
    MAX_CODE_ATTEMPTS,
};
use crate::ports::{CouponRegistryApi, RandomSource};
use parking_lot::RwLock;
use shared_types::{offset_timestamp, ChallengeId, CouponId, RewardGranted, TimeSource};
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

pub struct CouponRegistryService {
    book: RwLock<CouponBook>,
    policy: RewardCouponPolicy,
    rng: Arc<dyn RandomSource>,
    clock: Arc<dyn TimeSource>,
}

impl CouponRegistryService {
    pub fn new(
        policy: RewardCouponPolicy,
        rng: Arc<dyn RandomSource>,
        clock: Arc<dyn TimeSource>,
    ) -> Self {
        Self {
            book: RwLock::new(CouponBook::new()),
            policy,
            rng,
            clock,
        }
    }

    /// Registry rebuilt from persisted coupons.
    pub fn restore(
        coupons: Vec<Coupon>,
        policy: RewardCouponPolicy,
        rng: Arc<dyn RandomSource>,
        clock: Arc<dyn TimeSource>,
    ) -> Result<Self, CouponError> {
        let book = CouponBook::restore(coupons).inspect_err(|e| {
            warn!(error = %e, "[eco-03] Refusing to restore coupons");
        })?;
        info!(coupons = book.len(), "[eco-03] Coupon registry restored");
        Ok(Self {
            book: RwLock::new(book),
            policy,
            rng,
            clock,
        })
    }

    /// Install the demo wallet if the registry is empty. Returns how many
    /// coupons were added.
    pub fn seed_demo_coupons(&self) -> Result<usize, CouponError> {
        let mut book = self.book.write();
        if !book.is_empty() {
            return Ok(0);
        }
        let demo = demo_coupons(self.clock.now());
        let count = demo.len();
        for coupon in demo {
            book.insert(coupon)?;
        }
        info!(count, "[eco-03] Demo coupons installed");
        Ok(count)
    }

    pub fn policy(&self) -> &RewardCouponPolicy {
        &self.policy
    }

    fn issue_locked(
        &self,
        book: &mut CouponBook,
        brand_name: &str,
        discount_label: &str,
        valid_for: chrono::Duration,
        earned_from: Option<ChallengeId>,
    ) -> Result<Coupon, CouponError> {
        if brand_name.trim().is_empty() {
            return Err(CouponError::InvalidCoupon {
                reason: "brand name must not be empty".to_string(),
            });
        }
        if discount_label.trim().is_empty() {
            return Err(CouponError::InvalidCoupon {
                reason: "discount label must not be empty".to_string(),
            });
        }

        let code = self.free_code(book)?;
        let now = self.clock.now();
        let coupon = Coupon {
            id: CouponId::new(format!("coupon-{}", Uuid::new_v4())),
            brand_name: brand_name.trim().to_string(),
            discount_label: discount_label.trim().to_string(),
            code,
            issued_at: now,
            valid_until: offset_timestamp(now, valid_for.num_milliseconds()),
            used: false,
            used_at: None,
            earned_from,
        };
        book.insert(coupon.clone())?;

        info!(
            coupon = %coupon.id,
            brand = %coupon.brand_name,
            code = %coupon.code,
            valid_until = coupon.valid_until,
            "[eco-03] Coupon issued"
        );
        Ok(coupon)
    }

    fn free_code(&self, book: &CouponBook) -> Result<String, CouponError> {
        for attempt in 1..=MAX_CODE_ATTEMPTS {
            let code = code_from(|n| self.rng.random_usize(n));
            if !book.contains_code(&code) {
                return Ok(code);
            }
            debug!(attempt, code = %code, "[eco-03] Code collision, regenerating");
        }
        warn!(attempts = MAX_CODE_ATTEMPTS, "[eco-03] No free coupon code");
        Err(CouponError::CodeSpaceExhausted {
            attempts: MAX_CODE_ATTEMPTS,
        })
    }
}

impl CouponRegistryApi for CouponRegistryService {
    fn issue(
        &self,
        brand_name: &str,
        discount_label: &str,
        valid_for: chrono::Duration,
        earned_from: Option<ChallengeId>,
    ) -> Result<Coupon, CouponError> {
        let mut book = self.book.write();
        self.issue_locked(&mut book, brand_name, discount_label, valid_for, earned_from)
    }

    fn issue_for_reward(&self, reward: &RewardGranted) -> Result<Coupon, CouponError> {
        let mut book = self.book.write();
        if let Some(existing) = book.for_source(&reward.source_challenge) {
            debug!(
                challenge = %reward.source_challenge,
                coupon = %existing.id,
                "[eco-03] Reward coupon already issued"
            );
            return Ok(existing.clone());
        }

        let valid_for = self.policy.valid_for()?;
        let brand = self.policy.pick_brand(|n| self.rng.random_usize(n));
        self.issue_locked(
            &mut book,
            &brand,
            &self.policy.discount_label,
            valid_for,
            Some(reward.source_challenge.clone()),
        )
    }

    fn available_for_brand(&self, brand_name: &str) -> Vec<Coupon> {
        self.book
            .read()
            .available_for_brand(brand_name, self.clock.now())
    }

    fn redeem(&self, id: &CouponId) -> Result<Coupon, CouponError> {
        let now = self.clock.now();
        let result = self.book.write().redeem(id, now);
        match &result {
            Ok(c) => info!(coupon = %id, code = %c.code, "[eco-03] Coupon redeemed"),
            Err(e) => debug!(coupon = %id, error = %e, "[eco-03] Redemption refused"),
        }
        result
    }

    fn get(&self, id: &CouponId) -> Option<Coupon> {
        self.book.read().get(id).cloned()
    }

    fn find_by_code(&self, code: &str) -> Option<Coupon> {
        self.book.read().find_by_code(code).cloned()
    }

    fn list_active(&self) -> Vec<Coupon> {
        self.book.read().active(self.clock.now())
    }

    fn list_expired_or_used(&self) -> Vec<Coupon> {
        self.book.read().expired_or_used(self.clock.now())
    }

    fn list_all(&self) -> Vec<Coupon> {
        self.book.read().all()
    }
}
