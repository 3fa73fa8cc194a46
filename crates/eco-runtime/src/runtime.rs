//! # Eco Runtime
//!
//! Owns the engine, the scheduler driver task and the shutdown channel.

use std::sync::Arc;

use parking_lot::Mutex;
use shared_types::TimeSource;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::adapters::SnapshotStore;
use crate::container::EngineConfig;
use crate::engine::{EngineError, RewardsEngine};
use crate::handlers::SchedulerDriver;

pub struct EcoRuntime {
    engine: Arc<RewardsEngine>,
    shutdown_tx: watch::Sender<bool>,
    driver: Mutex<Option<JoinHandle<()>>>,
}

impl EcoRuntime {
    /// Boot the engine and spawn the scheduler driver.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(
        config: EngineConfig,
        store: Arc<dyn SnapshotStore>,
        clock: Arc<dyn TimeSource>,
    ) -> Result<Self, EngineError> {
        let tick = config.scheduler.tick();
        let engine = Arc::new(RewardsEngine::boot(config, store, clock)?);

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let driver = SchedulerDriver::new(Arc::clone(&engine), tick);
        let handle = tokio::spawn(driver.run(shutdown_rx));

        info!(
            balance = engine.balance(),
            active_challenges = engine.list_active_challenges().len(),
            active_coupons = engine.list_active_coupons().len(),
            "Eco runtime started"
        );

        Ok(Self {
            engine,
            shutdown_tx,
            driver: Mutex::new(Some(handle)),
        })
    }

    pub fn engine(&self) -> Arc<RewardsEngine> {
        Arc::clone(&self.engine)
    }

    /// Stop the driver and wait for it to exit.
    pub async fn shutdown(&self) {
        info!("Initiating graceful shutdown...");

        if let Err(e) = self.shutdown_tx.send(true) {
            error!("Failed to send shutdown signal: {}", e);
        }

        let handle = self.driver.lock().take();
        if let Some(handle) = handle {
            if let Err(e) = handle.await {
                error!("Scheduler driver ended abnormally: {}", e);
            }
        }

        info!("Shutdown complete");
    }
}
