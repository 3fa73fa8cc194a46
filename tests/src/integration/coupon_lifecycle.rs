//! Coupon issue, expiry, redemption and wallet queries.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use eco_03_coupon_registry::{
        CouponError, CouponRegistryApi, CouponRegistryService, RewardCouponPolicy,
        ThreadRandomSource,
    };
    use eco_runtime::{Classify, CommandOutcome, EngineError, NoOpReason};
    use shared_types::{CouponId, MockTimeSource};

    use crate::integration::{Fixture, NOW};

    fn coupon_ids(coupons: Vec<eco_03_coupon_registry::Coupon>) -> Vec<String> {
        coupons.into_iter().map(|c| c.id.to_string()).collect()
    }

    #[test]
    fn test_negative_validity_is_expired_on_issue() {
        let clock = Arc::new(MockTimeSource::new(NOW));
        let registry = CouponRegistryService::new(
            RewardCouponPolicy::default(),
            Arc::new(ThreadRandomSource),
            clock,
        );

        let coupon = registry
            .issue("EcoGreen", "10% off", chrono::Duration::milliseconds(-1), None)
            .unwrap();

        assert_eq!(coupon.valid_until, NOW - 1);
        assert!(registry.list_active().is_empty());
        assert!(registry.available_for_brand("EcoGreen").is_empty());
        assert!(matches!(
            registry.redeem(&coupon.id),
            Err(CouponError::Expired { .. })
        ));
        assert_eq!(registry.get(&coupon.id).map(|c| c.used), Some(false));
    }

    #[tokio::test]
    async fn test_expired_redeem_leaves_wallet_and_balance() {
        let f = Fixture::new();
        let coupon = CouponId::from("coupon-1");
        let valid_until = f.engine.coupon(&coupon).map(|c| c.valid_until).unwrap();
        f.clock.advance(valid_until - NOW + 1);
        let saves = f.store.saves();

        let err = f.engine.redeem_coupon(&coupon).await.unwrap_err();

        assert!(matches!(err, EngineError::Coupon(CouponError::Expired { .. })));
        assert!(!err.is_retryable());
        assert_eq!(f.engine.balance(), 850);
        assert_eq!(f.engine.coupon(&coupon).map(|c| c.used), Some(false));
        assert_eq!(f.store.saves(), saves);
    }

    #[tokio::test]
    async fn test_spent_demo_coupon_is_unchanged() {
        let f = Fixture::new();
        assert_eq!(
            f.engine
                .redeem_coupon(&CouponId::from("coupon-3"))
                .await
                .unwrap(),
            CommandOutcome::Unchanged(NoOpReason::AlreadyUsed)
        );
        assert_eq!(f.engine.balance(), 850);
    }

    #[tokio::test]
    async fn test_redeem_once_then_unchanged() {
        let f = Fixture::new();
        let coupon = CouponId::from("coupon-2");

        let used = f
            .engine
            .redeem_coupon(&coupon)
            .await
            .unwrap()
            .into_applied()
            .unwrap();
        assert!(used.used);
        assert_eq!(used.used_at, Some(NOW));

        assert_eq!(
            f.engine.redeem_coupon(&coupon).await.unwrap(),
            CommandOutcome::Unchanged(NoOpReason::AlreadyUsed)
        );
        assert_eq!(f.engine.balance(), 850);
    }

    #[tokio::test]
    async fn test_brand_lookup_ignores_case_and_hides_spent_coupons() {
        let f = Fixture::new();

        assert_eq!(
            coupon_ids(f.engine.list_coupons_for_brand("ECOGREEN")),
            vec!["coupon-1"]
        );
        assert_eq!(
            coupon_ids(f.engine.list_coupons_for_brand("ecogreen")),
            vec!["coupon-1"]
        );
        assert!(f.engine.list_coupons_for_brand("greenliving").is_empty());
        assert!(f.engine.list_coupons_for_brand("Nobody").is_empty());

        f.engine
            .redeem_coupon(&CouponId::from("coupon-1"))
            .await
            .unwrap();
        assert!(f.engine.list_coupons_for_brand("EcoGreen").is_empty());

        let mut spent = coupon_ids(f.engine.list_expired_or_used_coupons());
        spent.sort();
        assert_eq!(spent, vec!["coupon-1", "coupon-3"]);
        assert_eq!(coupon_ids(f.engine.list_active_coupons()), vec!["coupon-2"]);
    }

    #[tokio::test]
    async fn test_code_lookup_is_case_insensitive() {
        let f = Fixture::new();
        let found = f.engine.find_coupon_by_code(" eco4a2b5c ");
        assert_eq!(found.map(|c| c.id), Some(CouponId::from("coupon-1")));
        assert!(f.engine.find_coupon_by_code("NOPE0000").is_none());
    }

    #[tokio::test]
    async fn test_coupon_expires_as_clock_passes_validity() {
        let f = Fixture::new();
        assert_eq!(f.engine.list_active_coupons().len(), 2);

        f.clock.advance_days(31);
        assert_eq!(coupon_ids(f.engine.list_active_coupons()), vec!["coupon-2"]);

        f.clock.advance_days(15);
        assert!(f.engine.list_active_coupons().is_empty());
    }
}
