//! # Restart Scenarios
//!
//! State written by one session must come back unchanged in the next:
//! completions stay completed, used coupons stay used, and the seed catalog
//! never overwrites what the user already earned.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use eco_02_quest_engine::ChallengeStatus;
    use eco_runtime::adapters::{JsonFileStore, LockError, SnapshotStore, StoreError};
    use eco_runtime::{CommandOutcome, EngineConfig, NoOpReason, RewardsEngine};
    use shared_types::{ChallengeId, CouponId, MockTimeSource};

    use crate::integration::{challenge, Fixture, NOW};

    fn id(s: &str) -> ChallengeId {
        ChallengeId::from(s)
    }

    fn boot_dir(dir: &std::path::Path) -> (Arc<JsonFileStore>, RewardsEngine) {
        let store = Arc::new(JsonFileStore::open(dir).unwrap());
        let engine = RewardsEngine::boot(
            EngineConfig::default(),
            store.clone(),
            Arc::new(MockTimeSource::new(NOW)),
        )
        .unwrap();
        (store, engine)
    }

    #[tokio::test]
    async fn test_reload_keeps_completions_and_redemptions() {
        let f = Fixture::new();
        f.engine.complete_challenge(&id("default-1")).await.unwrap();
        f.engine
            .redeem_coupon(&CouponId::from("coupon-1"))
            .await
            .unwrap();

        let f = f.restart();

        assert_eq!(f.engine.balance(), 950);
        assert_eq!(
            f.engine.challenge(&id("default-1")).map(|c| c.status),
            Some(ChallengeStatus::Completed)
        );
        assert_eq!(
            f.engine.coupon(&CouponId::from("coupon-1")).map(|c| c.used),
            Some(true)
        );
        assert_eq!(
            f.engine.complete_challenge(&id("default-1")).await.unwrap(),
            CommandOutcome::Unchanged(NoOpReason::AlreadyCompleted)
        );
        assert_eq!(
            f.engine
                .redeem_coupon(&CouponId::from("coupon-1"))
                .await
                .unwrap(),
            CommandOutcome::Unchanged(NoOpReason::AlreadyUsed)
        );
        assert_eq!(f.engine.balance(), 950);
    }

    #[tokio::test]
    async fn test_reload_keeps_catalog_order_and_enrolled_challenges() {
        let f = Fixture::new();
        f.engine
            .enroll_challenge(challenge("user-bike", 40))
            .await
            .unwrap();
        f.engine.toggle_challenge(&id("default-2")).await.unwrap();

        let f = f.restart();

        let order: Vec<_> = f
            .engine
            .list_active_challenges()
            .into_iter()
            .map(|c| c.id.to_string())
            .collect();
        assert_eq!(order, vec!["default-1", "user-bike"]);
        assert_eq!(
            f.engine.list_paused_challenges().first().map(|c| c.id.clone()),
            Some(id("default-2"))
        );
        assert_eq!(f.engine.list_completed_challenges().len(), 2);
    }

    #[tokio::test]
    async fn test_demo_wallet_not_reseeded_after_spending() {
        let f = Fixture::new();
        for coupon in ["coupon-1", "coupon-2"] {
            f.engine
                .redeem_coupon(&CouponId::from(coupon))
                .await
                .unwrap();
        }

        let f = f.restart();
        assert!(f.engine.list_active_coupons().is_empty());
        assert_eq!(f.engine.list_expired_or_used_coupons().len(), 3);
    }

    #[tokio::test]
    async fn test_data_dir_round_trip() {
        let dir = tempfile::tempdir().unwrap();

        {
            let (_store, engine) = boot_dir(dir.path());
            engine.complete_challenge(&id("default-2")).await.unwrap();
            engine.daily_check_in().await.unwrap();
        }

        let (store, engine) = boot_dir(dir.path());
        assert_eq!(engine.balance(), 1055);
        assert_eq!(engine.progression().progression.xp, 1550);
        assert_eq!(engine.progression().streak, 1);
        assert!(engine.audit().is_ok());

        let on_disk: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(store.path()).unwrap()).unwrap();
        assert_eq!(on_disk["version"], 1);
        assert_eq!(on_disk["balance"], 1055);
        assert_eq!(store.load().unwrap().map(|s| s.ledger.len()), Some(3));
    }

    #[test]
    fn test_second_session_on_same_dir_is_refused() {
        let dir = tempfile::tempdir().unwrap();
        let _first = JsonFileStore::open(dir.path()).unwrap();

        let second = JsonFileStore::open(dir.path());
        assert!(matches!(
            second,
            Err(StoreError::Lock(LockError::AlreadyLocked { .. }))
        ));
    }

    #[test]
    fn test_corrupt_snapshot_refuses_boot() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("eco-state.json"), b"{ not json").unwrap();

        let store = Arc::new(JsonFileStore::open(dir.path()).unwrap());
        let result = RewardsEngine::boot(
            EngineConfig::default(),
            store,
            Arc::new(MockTimeSource::new(NOW)),
        );
        assert!(result.is_err());
    }
}
