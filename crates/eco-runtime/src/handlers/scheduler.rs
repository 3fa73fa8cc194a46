//! # Scheduler Driver
//!
//! Ticks the notification scheduler at a fixed interval until shutdown is
//! signalled. Delivery and bus publication happen inside
//! `RewardsEngine::tick`.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use crate::engine::RewardsEngine;

pub struct SchedulerDriver {
    engine: Arc<RewardsEngine>,
    tick: Duration,
}

impl SchedulerDriver {
    pub fn new(engine: Arc<RewardsEngine>, tick: Duration) -> Self {
        Self { engine, tick }
    }

    /// Run until `shutdown` flips to `true` or its sender is dropped.
    /// Pending announcements are dropped on exit; the state they describe is
    /// already persisted.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        info!(tick_ms = self.tick.as_millis() as u64, "[eco-04] Scheduler driver started");

        let mut interval = tokio::time::interval(self.tick);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    let delivered = self.engine.tick().await;
                    if !delivered.is_empty() {
                        debug!(count = delivered.len(), "[eco-04] Tick delivered notifications");
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }

        let dropped = self.engine.cancel_notifications();
        info!(dropped, "[eco-04] Scheduler driver stopped");
    }
}
