//! # Snapshot Storage
//!
//! The whole durable state of one user session is a single versioned
//! snapshot: ledger entries, challenges, XP, coupons, the check-in streak and
//! reward coupons still waiting to be issued.
//!
//! - `JsonFileStore`: JSON file written atomically (temp file + rename) in a
//!   data directory guarded by an exclusive lock file
//! - `InMemoryStore`: for tests

mod json_file;
mod lock;
mod memory;

pub use json_file::JsonFileStore;
pub use lock::{DataDirLock, LockError};
pub use memory::InMemoryStore;

use std::path::PathBuf;

use eco_01_ledger::LedgerEntry;
use eco_02_quest_engine::Challenge;
use eco_03_coupon_registry::Coupon;
use serde::{Deserialize, Serialize};
use shared_types::{Classify, ErrorClass, RewardGranted, Timestamp};
use thiserror::Error;

use crate::engine::CheckInState;

/// Current snapshot layout.
pub const SNAPSHOT_VERSION: u32 = 1;

/// Durable state of the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub version: u32,
    pub saved_at: Timestamp,
    /// Redundant with the last ledger entry; checked on load.
    pub balance: u64,
    pub ledger: Vec<LedgerEntry>,
    /// Catalog order.
    pub challenges: Vec<Challenge>,
    pub xp: u64,
    /// Issuance order.
    pub coupons: Vec<Coupon>,
    #[serde(default)]
    pub check_in: CheckInState,
    /// Rewards whose coupon could not be issued yet.
    #[serde(default)]
    pub pending_coupons: Vec<RewardGranted>,
}

/// Storage errors.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to encode snapshot: {0}")]
    Encode(serde_json::Error),

    #[error("Failed to decode snapshot {}: {source}", .path.display())]
    Decode {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Unsupported snapshot version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },

    #[error(transparent)]
    Lock(#[from] LockError),

    #[error("Inconsistent snapshot: {0}")]
    Inconsistent(String),
}

impl Classify for StoreError {
    fn class(&self) -> ErrorClass {
        match self {
            Self::Io { .. } | Self::Lock(_) => ErrorClass::Transient,
            _ => ErrorClass::Rejected,
        }
    }
}

/// Where snapshots live.
pub trait SnapshotStore: Send + Sync {
    /// The last saved snapshot, or `None` on first boot.
    fn load(&self) -> Result<Option<Snapshot>, StoreError>;

    /// Replace the stored snapshot. Must be all-or-nothing.
    fn save(&self, snapshot: &Snapshot) -> Result<(), StoreError>;
}
