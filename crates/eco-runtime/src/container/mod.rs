//! # Subsystem Container
//!
//! Central container holding all reward subsystem instances with proper
//! lifetime management and dependency injection.
//!
//! - Subsystems initialized in dependency order (Level 0 → Level 3)
//! - Adapters implement the outbound ports of each subsystem

pub mod config;
pub mod subsystems;

pub use config::{
    CheckInConfig, ConfigError, CouponConfig, EngineConfig, LedgerConfig, QuestConfig,
    SchedulerConfig, StorageConfig,
};
pub use subsystems::SubsystemContainer;
