//! # Adapter Implementations
//!
//! Concrete implementations of the subsystems' outbound ports, plus the
//! snapshot storage backends.
//!
//! ```text
//! QuestEngine ──CoinLedger──→ LedgerAdapter ──→ LedgerService
//! Scheduler ──CouponIssuer──→ CouponIssuerAdapter ──→ CouponRegistryService
//! RewardsEngine ──SnapshotStore──→ JsonFileStore | InMemoryStore
//! ```

pub mod coupons;
pub mod ledger;
pub mod storage;

pub use coupons::CouponIssuerAdapter;
pub use ledger::LedgerAdapter;
pub use storage::{
    DataDirLock, InMemoryStore, JsonFileStore, LockError, Snapshot, SnapshotStore, StoreError,
    SNAPSHOT_VERSION,
};
