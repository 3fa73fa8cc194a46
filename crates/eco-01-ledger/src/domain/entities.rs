//! Ledger entities.

use serde::{Deserialize, Serialize};
use shared_types::Timestamp;
use std::fmt;

/// Sequence number of a ledger entry. The first entry is 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(pub u64);

impl EntryId {
    /// Id preceding every real entry.
    pub const GENESIS: EntryId = EntryId(0);

    pub fn next(self) -> EntryId {
        EntryId(self.0 + 1)
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// An applied balance change. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// Sequence number.
    pub id: EntryId,
    /// Signed delta: positive for credits, negative for debits.
    pub amount: i64,
    /// Audit text.
    pub reason: String,
    /// Balance after this entry was applied.
    pub resulting_balance: u64,
    /// When the entry was applied.
    pub timestamp: Timestamp,
}

impl LedgerEntry {
    pub fn is_credit(&self) -> bool {
        self.amount > 0
    }

    pub fn is_debit(&self) -> bool {
        self.amount < 0
    }

    /// Balance before this entry, derived from its own fields.
    pub fn previous_balance(&self) -> i128 {
        self.resulting_balance as i128 - self.amount as i128
    }
}
