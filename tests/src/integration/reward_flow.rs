//! # Reward Flow
//!
//! Completing a challenge touches every subsystem:
//!
//! 1. **Quest Engine (2) → Ledger (1)**: reward coins credited
//! 2. **Runtime → Coupon Registry (3)**: reward coupon issued
//! 3. **Quest Engine (2) → Scheduler (4)**: coin-award, then coupon-unlock

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use eco_02_quest_engine::{ChallengeStatus, QuestError};
    use eco_04_notification_scheduler::NotificationKind;
    use eco_runtime::{CommandOutcome, EngineError, NoOpReason, RewardsEngine};
    use shared_bus::{EventFilter, RewardEvent};
    use shared_types::ChallengeId;

    use crate::integration::{challenge, Fixture};

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    fn id(s: &str) -> ChallengeId {
        ChallengeId::from(s)
    }

    async fn fixture_with(challenges: &[(&str, u32)]) -> Fixture {
        let fixture = Fixture::new();
        for (name, coins) in challenges {
            fixture
                .engine
                .enroll_challenge(challenge(name, *coins))
                .await
                .unwrap();
        }
        fixture
    }

    async fn complete(engine: Arc<RewardsEngine>, name: &'static str) -> bool {
        engine
            .complete_challenge(&id(name))
            .await
            .unwrap()
            .is_applied()
    }

    // =============================================================================
    // COMPLETION
    // =============================================================================

    #[tokio::test]
    async fn test_completion_credits_and_announces_coin_before_coupon() {
        let f = fixture_with(&[("c1", 50)]).await;
        assert_eq!(f.engine.balance(), 850);

        let receipt = f
            .engine
            .complete_challenge(&id("c1"))
            .await
            .unwrap()
            .into_applied()
            .unwrap();

        assert_eq!(f.engine.balance(), 900);
        assert_eq!(
            f.engine.challenge(&id("c1")).map(|c| c.status),
            Some(ChallengeStatus::Completed)
        );

        f.clock.advance(100);
        f.engine.tick().await;
        f.clock.advance(2_000);
        f.engine.tick().await;

        let chain: Vec<_> = f
            .engine
            .transcript()
            .into_iter()
            .filter(|n| n.chain == Some(receipt.chain))
            .map(|n| n.kind)
            .collect();
        assert_eq!(
            chain,
            vec![NotificationKind::CoinAward, NotificationKind::CouponUnlock]
        );
        assert_eq!(f.engine.pending_notifications(), 0);
    }

    #[tokio::test]
    async fn test_second_completion_is_noop() {
        let f = fixture_with(&[("c1", 50)]).await;
        f.engine.complete_challenge(&id("c1")).await.unwrap();
        let saves = f.store.saves();

        let again = f.engine.complete_challenge(&id("c1")).await.unwrap();

        assert_eq!(again, CommandOutcome::Unchanged(NoOpReason::AlreadyCompleted));
        assert_eq!(f.engine.balance(), 900);
        assert_eq!(f.engine.ledger_entries().len(), 2);
        assert_eq!(f.store.saves(), saves);
    }

    #[tokio::test]
    async fn test_unknown_challenge_leaves_balance() {
        let f = Fixture::new();
        let err = f
            .engine
            .complete_challenge(&id("missing"))
            .await
            .unwrap_err();

        assert!(matches!(err, EngineError::Quest(QuestError::NotFound(_))));
        assert_eq!(f.engine.balance(), 850);
        assert_eq!(f.engine.pending_notifications(), 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_completions_sum_exactly() {
        let f = fixture_with(&[("c1", 50), ("c2", 30)]).await;

        let first = tokio::spawn(complete(f.engine.clone(), "c1"));
        let second = tokio::spawn(complete(f.engine.clone(), "c2"));
        let (first, second) = tokio::join!(first, second);

        assert!(first.unwrap());
        assert!(second.unwrap());
        assert_eq!(f.engine.balance(), 930);
        assert!(f.engine.audit().is_ok());

        // Each completion stays idempotent on its own.
        let replays = [
            tokio::spawn(complete(f.engine.clone(), "c1")),
            tokio::spawn(complete(f.engine.clone(), "c2")),
            tokio::spawn(complete(f.engine.clone(), "c1")),
        ];
        for replay in replays {
            assert!(!replay.await.unwrap());
        }
        assert_eq!(f.engine.balance(), 930);
        assert_eq!(f.store.snapshot().map(|s| s.balance), Some(930));
    }

    // =============================================================================
    // ANNOUNCEMENTS
    // =============================================================================

    #[tokio::test]
    async fn test_cancelled_chain_skips_unlock_but_keeps_coupon() {
        let f = fixture_with(&[("c1", 50)]).await;
        let receipt = f
            .engine
            .complete_challenge(&id("c1"))
            .await
            .unwrap()
            .into_applied()
            .unwrap();

        f.clock.advance(100);
        let coin = f.engine.tick().await;
        assert_eq!(coin.len(), 1);

        assert_eq!(f.engine.cancel_chain(receipt.chain), 1);
        f.clock.advance(10_000);
        assert!(f.engine.tick().await.is_empty());

        let earned: Vec<_> = f
            .engine
            .list_active_coupons()
            .into_iter()
            .filter(|c| c.earned_from == Some(id("c1")))
            .collect();
        assert_eq!(earned.len(), 1);
        assert_eq!(Some(&earned[0]), receipt.coupon.as_ref());
    }

    #[tokio::test]
    async fn test_bus_sees_credit_before_reward() {
        let f = fixture_with(&[("c1", 50)]).await;
        let mut sub = f.engine.subscribe(EventFilter::all());

        f.engine.complete_challenge(&id("c1")).await.unwrap();
        let events = sub.drain();

        assert!(matches!(
            &events[0],
            RewardEvent::CoinsCredited { amount: 50, balance: 900, .. }
        ));
        assert!(matches!(&events[1], RewardEvent::RewardGranted(r) if r.coins == 50));
        assert!(matches!(&events[2], RewardEvent::CouponIssued(_)));
    }
}
