//! # Eco-Rewards Runtime
//!
//! Host process for the eco-rewards engine.
//!
//! ## Startup Sequence
//!
//! 1. Initialize telemetry (logs + metrics)
//! 2. Load configuration (file named by `ECO_CONFIG`, then env overrides)
//! 3. Open and lock the data directory
//! 4. Boot the engine (restore snapshot or first-boot seed)
//! 5. Spawn the scheduler driver
//! 6. Run until Ctrl+C

use std::sync::Arc;

use anyhow::{Context, Result};
use eco_runtime::adapters::JsonFileStore;
use eco_runtime::{EcoRuntime, EngineConfig};
use eco_telemetry::{init_telemetry, TelemetryConfig};
use shared_types::SystemTimeSource;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let _telemetry =
        init_telemetry(TelemetryConfig::from_env()).context("Failed to initialize telemetry")?;

    let config = EngineConfig::load().context("Failed to load configuration")?;
    info!(data_dir = %config.storage.data_dir.display(), "Configuration loaded");

    let store = JsonFileStore::open(&config.storage.data_dir)
        .context("Failed to open the data directory")?;
    let runtime = EcoRuntime::start(config, Arc::new(store), Arc::new(SystemTimeSource))
        .context("Failed to boot the rewards engine")?;

    let engine = runtime.engine();
    let progress = engine.progression();
    info!(
        balance = engine.balance(),
        level = progress.progression.level,
        xp = progress.progression.xp,
        streak = progress.streak,
        "Eco-rewards engine is running. Press Ctrl+C to stop."
    );

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for Ctrl+C")?;

    runtime.shutdown().await;
    Ok(())
}
