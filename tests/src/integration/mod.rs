//! Cross-subsystem scenarios.

pub mod check_in;
pub mod coupon_lifecycle;
pub mod persistence;
pub mod reward_flow;

use std::sync::Arc;

use eco_02_quest_engine::{Difficulty, NewChallenge};
use eco_runtime::adapters::InMemoryStore;
use eco_runtime::{EngineConfig, RewardsEngine};
use shared_types::MockTimeSource;

/// 2025-01-10T09:00:00Z
pub const NOW: u64 = 1_736_499_600_000;

/// Engine over an in-memory store and a manual clock.
pub struct Fixture {
    pub clock: Arc<MockTimeSource>,
    pub store: Arc<InMemoryStore>,
    pub engine: Arc<RewardsEngine>,
}

impl Fixture {
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        let clock = Arc::new(MockTimeSource::new(NOW));
        let store = Arc::new(InMemoryStore::new());
        let engine = RewardsEngine::boot(config, store.clone(), clock.clone())
            .unwrap_or_else(|e| panic!("boot failed: {e}"));
        Self {
            clock,
            store,
            engine: Arc::new(engine),
        }
    }

    /// Boot a second engine from what this one saved, as after an app restart.
    pub fn restart(self) -> Self {
        let Self { clock, store, engine } = self;
        drop(engine);
        let snapshot = store.snapshot().unwrap_or_else(|| panic!("nothing was saved"));
        let store = Arc::new(InMemoryStore::with_snapshot(snapshot));
        let engine = RewardsEngine::boot(EngineConfig::default(), store.clone(), clock.clone())
            .unwrap_or_else(|e| panic!("reboot failed: {e}"));
        Self {
            clock,
            store,
            engine: Arc::new(engine),
        }
    }
}

impl Default for Fixture {
    fn default() -> Self {
        Self::new()
    }
}

/// User challenge worth `coins`.
pub fn challenge(id: &str, coins: u32) -> NewChallenge {
    NewChallenge {
        id: id.into(),
        title: format!("Challenge {id}"),
        description: "Walk instead of driving".into(),
        category: "Transport".into(),
        difficulty: Difficulty::Easy,
        reward_coins: coins,
        reward_xp: 40,
        target_duration: "3 days".into(),
        icon: "🚶".into(),
        progress: 0,
    }
}
