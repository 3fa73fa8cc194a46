//! # Ledger Service
//!
//! Wraps the domain `Ledger` with a lock and a clock and implements
//! `LedgerApi`.

use crate::domain::{EntryId, Ledger, LedgerEntry, LedgerError};
use crate::ports::LedgerApi;
use parking_lot::RwLock;
use shared_types::TimeSource;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Thread-safe ledger service.
pub struct LedgerService {
    ledger: RwLock<Ledger>,
    clock: Arc<dyn TimeSource>,
}

impl LedgerService {
    /// Service around an empty ledger.
    pub fn new(clock: Arc<dyn TimeSource>) -> Self {
        Self {
            ledger: RwLock::new(Ledger::new()),
            clock,
        }
    }

    /// Fresh ledger seeded with an opening balance entry.
    pub fn with_opening_balance(
        clock: Arc<dyn TimeSource>,
        opening_balance: u64,
    ) -> Result<Self, LedgerError> {
        let ledger = Ledger::with_opening_balance(opening_balance, clock.now())?;
        info!(opening_balance, "[eco-01] Ledger opened");
        Ok(Self {
            ledger: RwLock::new(ledger),
            clock,
        })
    }

    /// Ledger restored from persisted entries.
    pub fn restore(
        clock: Arc<dyn TimeSource>,
        entries: Vec<LedgerEntry>,
    ) -> Result<Self, LedgerError> {
        let ledger = Ledger::restore(entries).inspect_err(|e| {
            warn!(error = %e, "[eco-01] Refusing to restore ledger");
        })?;
        info!(
            entries = ledger.len(),
            balance = ledger.balance(),
            "[eco-01] Ledger restored"
        );
        Ok(Self {
            ledger: RwLock::new(ledger),
            clock,
        })
    }

    /// Verify the full history.
    pub fn audit(&self) -> Result<(), LedgerError> {
        self.ledger.read().audit()
    }

    pub fn last_entry(&self) -> Option<LedgerEntry> {
        self.ledger.read().last_entry().cloned()
    }
}

impl LedgerApi for LedgerService {
    fn credit(&self, amount: i64, reason: &str) -> Result<LedgerEntry, LedgerError> {
        let now = self.clock.now();
        let entry = self.ledger.write().credit(amount, reason, now)?;
        info!(
            entry = %entry.id,
            amount,
            balance = entry.resulting_balance,
            reason,
            "[eco-01] Coins credited"
        );
        Ok(entry)
    }

    fn debit(&self, amount: i64, reason: &str) -> Result<LedgerEntry, LedgerError> {
        let now = self.clock.now();
        let entry = self.ledger.write().debit(amount, reason, now)?;
        info!(
            entry = %entry.id,
            amount,
            balance = entry.resulting_balance,
            reason,
            "[eco-01] Coins debited"
        );
        Ok(entry)
    }

    fn balance(&self) -> u64 {
        self.ledger.read().balance()
    }

    fn entries(&self) -> Vec<LedgerEntry> {
        self.ledger.read().entries().to_vec()
    }

    fn entries_since(&self, id: EntryId) -> Vec<LedgerEntry> {
        let ledger = self.ledger.read();
        let tail = ledger.entries_since(id);
        debug!(since = %id, count = tail.len(), "[eco-01] Entries queried");
        tail.to_vec()
    }
}
