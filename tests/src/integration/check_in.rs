//! Daily check-in across days and restarts.

#[cfg(test)]
mod tests {
    use eco_04_notification_scheduler::{NotificationKind, NotificationPayload};
    use eco_runtime::{CommandOutcome, EngineConfig, NoOpReason};
    use shared_types::DAY_MS;

    use crate::integration::Fixture;

    #[tokio::test]
    async fn test_streak_grows_resets_and_survives_restart() {
        let f = Fixture::new();

        for expected in 1..=3 {
            let receipt = f
                .engine
                .daily_check_in()
                .await
                .unwrap()
                .into_applied()
                .unwrap();
            assert_eq!(receipt.streak, expected);
            f.clock.advance(DAY_MS);
        }
        assert_eq!(f.engine.balance(), 865);

        let f = f.restart();
        assert_eq!(f.engine.progression().streak, 3);
        let fourth = f.engine.daily_check_in().await.unwrap().into_applied().unwrap();
        assert_eq!(fourth.streak, 4);

        f.clock.advance(2 * DAY_MS);
        assert_eq!(f.engine.progression().streak, 0);
        let after_gap = f.engine.daily_check_in().await.unwrap().into_applied().unwrap();
        assert_eq!(after_gap.streak, 1);
        assert_eq!(f.engine.balance(), 875);
    }

    #[tokio::test]
    async fn test_same_day_twice_credits_once() {
        let f = Fixture::new();
        f.engine.daily_check_in().await.unwrap();
        f.clock.advance(60_000);

        assert_eq!(
            f.engine.daily_check_in().await.unwrap(),
            CommandOutcome::Unchanged(NoOpReason::AlreadyCheckedIn)
        );
        assert_eq!(f.engine.balance(), 855);
        assert_eq!(f.engine.ledger_entries().len(), 2);
    }

    #[tokio::test]
    async fn test_check_in_is_announced() {
        let mut config = EngineConfig::default();
        config.check_in.coins = 12;
        let f = Fixture::with_config(config);

        f.engine.daily_check_in().await.unwrap();
        f.clock.advance(100);
        let delivered = f.engine.tick().await;

        assert_eq!(delivered.len(), 1);
        assert_eq!(delivered[0].kind, NotificationKind::CoinAward);
        assert!(matches!(
            &delivered[0].payload,
            NotificationPayload::Coins { amount: 12, .. }
        ));
        assert_eq!(f.engine.balance(), 862);
    }
}
