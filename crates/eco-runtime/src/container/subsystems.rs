//! # Subsystem Container
//!
//! Holds all reward subsystem instances and wires their ports.
//!
//! ## Initialization Order
//!
//! Subsystems are initialized in strict dependency order:
//!
//! ```text
//! Level 0: Ledger (no dependencies)
//! Level 1: Coupon Registry (no dependencies)
//! Level 2: Quest Engine (credits through the Ledger)
//! Level 3: Notification Scheduler (issues through the Coupon Registry)
//! ```
//!
//! On first boot the ledger opens with the configured balance and the demo
//! wallet is installed; otherwise every subsystem is rebuilt from the
//! snapshot, and the seed catalog is merged under the persisted challenges.

use std::sync::Arc;

use eco_01_ledger::{LedgerApi, LedgerService};
use eco_02_quest_engine::{merge_catalog, seed_challenges, QuestEngineApi, QuestEngineService};
use eco_03_coupon_registry::{CouponRegistryApi, CouponRegistryService, RandomSource};
use eco_04_notification_scheduler::NotificationSchedulerService;
use shared_types::{RewardGranted, TimeSource};
use tracing::{info, instrument};

use crate::adapters::{CouponIssuerAdapter, LedgerAdapter, Snapshot, StoreError, SNAPSHOT_VERSION};
use crate::container::config::EngineConfig;
use crate::engine::{CheckInState, EngineError};

/// Central container holding all subsystem instances.
pub struct SubsystemContainer {
    pub config: EngineConfig,

    /// Ledger (Subsystem 1)
    pub ledger: Arc<LedgerService>,

    /// Quest Engine (Subsystem 2)
    pub quests: Arc<QuestEngineService>,

    /// Coupon Registry (Subsystem 3)
    pub coupons: Arc<CouponRegistryService>,

    /// Notification Scheduler (Subsystem 4)
    pub scheduler: Arc<NotificationSchedulerService>,

    pub clock: Arc<dyn TimeSource>,
}

impl SubsystemContainer {
    /// Build every subsystem, from `snapshot` if there is one.
    #[instrument(skip_all, fields(restoring = snapshot.is_some()))]
    pub fn assemble(
        config: EngineConfig,
        snapshot: Option<&Snapshot>,
        clock: Arc<dyn TimeSource>,
        rng: Arc<dyn RandomSource>,
    ) -> Result<Self, EngineError> {
        // Level 0
        let ledger = match snapshot {
            Some(s) => {
                let ledger = LedgerService::restore(clock.clone(), s.ledger.clone())?;
                if ledger.balance() != s.balance {
                    return Err(StoreError::Inconsistent(format!(
                        "recorded balance {} but entries sum to {}",
                        s.balance,
                        ledger.balance()
                    ))
                    .into());
                }
                ledger
            }
            None => {
                LedgerService::with_opening_balance(clock.clone(), config.ledger.opening_balance)?
            }
        };
        let ledger = Arc::new(ledger);

        // Level 1
        let coupons = match snapshot {
            Some(s) => CouponRegistryService::restore(
                s.coupons.clone(),
                config.coupons.reward.clone(),
                rng,
                clock.clone(),
            )?,
            None => {
                let registry =
                    CouponRegistryService::new(config.coupons.reward.clone(), rng, clock.clone());
                if config.coupons.seed_demo_coupons {
                    registry.seed_demo_coupons()?;
                }
                registry
            }
        };
        let coupons = Arc::new(coupons);

        // Level 2
        let (persisted, xp) = match snapshot {
            Some(s) => (s.challenges.clone(), s.xp),
            None => (Vec::new(), config.quests.starting_xp),
        };
        let quests = Arc::new(QuestEngineService::new(
            merge_catalog(seed_challenges(), persisted),
            xp,
            config.quests.curve(),
            Arc::new(LedgerAdapter::new(ledger.clone())),
            clock.clone(),
        ));

        // Level 3
        let scheduler = Arc::new(NotificationSchedulerService::new(
            config.scheduler.timing(),
            config.scheduler.transcript_capacity,
            Arc::new(CouponIssuerAdapter::new(coupons.clone())),
            clock.clone(),
        ));

        info!(
            balance = ledger.balance(),
            challenges = quests.list_all().len(),
            coupons = coupons.list_all().len(),
            "All subsystems initialized"
        );

        Ok(Self {
            config,
            ledger,
            quests,
            coupons,
            scheduler,
            clock,
        })
    }

    /// Durable state of every subsystem. Callers must keep mutations out
    /// while this runs for the result to be consistent.
    pub fn capture(
        &self,
        check_in: CheckInState,
        pending_coupons: Vec<RewardGranted>,
    ) -> Snapshot {
        Snapshot {
            version: SNAPSHOT_VERSION,
            saved_at: self.clock.now(),
            balance: self.ledger.balance(),
            ledger: self.ledger.entries(),
            challenges: self.quests.list_all(),
            xp: self.quests.xp(),
            coupons: self.coupons.list_all(),
            check_in,
            pending_coupons,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eco_02_quest_engine::ChallengeStatus;
    use eco_03_coupon_registry::ThreadRandomSource;
    use shared_types::{ChallengeId, MockTimeSource};

    const NOW: u64 = 1_736_500_000_000;

    fn assemble(config: EngineConfig, snapshot: Option<&Snapshot>) -> SubsystemContainer {
        SubsystemContainer::assemble(
            config,
            snapshot,
            Arc::new(MockTimeSource::new(NOW)),
            Arc::new(ThreadRandomSource),
        )
        .unwrap()
    }

    #[test]
    fn test_first_boot() {
        let container = assemble(EngineConfig::default(), None);

        assert_eq!(container.ledger.balance(), 850);
        assert_eq!(container.ledger.entries().len(), 1);
        assert_eq!(container.quests.list_all().len(), 4);
        assert_eq!(container.quests.progression().xp, 1250);
        assert_eq!(container.coupons.list_all().len(), 3);
    }

    #[test]
    fn test_first_boot_without_demo_wallet() {
        let mut config = EngineConfig::default();
        config.coupons.seed_demo_coupons = false;
        let container = assemble(config, None);
        assert!(container.coupons.list_all().is_empty());
    }

    #[test]
    fn test_capture_and_restore() {
        let first = assemble(EngineConfig::default(), None);
        first.quests.complete(&ChallengeId::from("default-1")).unwrap();
        let snapshot = first.capture(CheckInState::default(), Vec::new());

        let second = assemble(EngineConfig::default(), Some(&snapshot));
        assert_eq!(second.ledger.balance(), 950);
        assert_eq!(second.quests.progression().xp, 1400);
        assert_eq!(
            second
                .quests
                .get(&ChallengeId::from("default-1"))
                .map(|c| c.status),
            Some(ChallengeStatus::Completed)
        );
        assert_eq!(second.coupons.list_all(), first.coupons.list_all());
    }

    #[test]
    fn test_balance_mismatch_refused() {
        let first = assemble(EngineConfig::default(), None);
        let mut snapshot = first.capture(CheckInState::default(), Vec::new());
        snapshot.balance += 1;

        let result = SubsystemContainer::assemble(
            EngineConfig::default(),
            Some(&snapshot),
            Arc::new(MockTimeSource::new(NOW)),
            Arc::new(ThreadRandomSource),
        );
        assert!(matches!(
            result,
            Err(EngineError::Storage(StoreError::Inconsistent(_)))
        ));
    }

    #[test]
    fn test_tampered_ledger_refused() {
        let first = assemble(EngineConfig::default(), None);
        let mut snapshot = first.capture(CheckInState::default(), Vec::new());
        snapshot.ledger[0].resulting_balance = 10_000;
        snapshot.balance = 10_000;

        let result = SubsystemContainer::assemble(
            EngineConfig::default(),
            Some(&snapshot),
            Arc::new(MockTimeSource::new(NOW)),
            Arc::new(ThreadRandomSource),
        );
        assert!(matches!(result, Err(EngineError::Ledger(_))));
    }
}
