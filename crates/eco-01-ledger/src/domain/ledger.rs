//! # Ledger Core
//!
//! Append-only entry list plus the cached balance. The balance field is only
//! ever assigned from a freshly appended entry's `resulting_balance`.

use super::entities::{EntryId, LedgerEntry};
use super::errors::LedgerError;
use super::invariants::{invariant_balance_matches_sum, verify_chain};
use shared_types::Timestamp;

/// Reason recorded for the opening entry.
pub const OPENING_BALANCE_REASON: &str = "opening balance";

/// The eco-coin ledger for one user.
#[derive(Debug, Clone, Default)]
pub struct Ledger {
    entries: Vec<LedgerEntry>,
    balance: u64,
}

impl Ledger {
    /// Empty ledger with a zero balance.
    pub fn new() -> Self {
        Self::default()
    }

    /// Ledger whose first entry credits `amount` as the opening balance.
    ///
    /// A zero opening balance yields an empty ledger.
    pub fn with_opening_balance(amount: u64, now: Timestamp) -> Result<Self, LedgerError> {
        let mut ledger = Self::new();
        if amount > 0 {
            let amount = i64::try_from(amount).map_err(|_| LedgerError::BalanceOverflow {
                balance: 0,
                amount,
            })?;
            ledger.credit(amount, OPENING_BALANCE_REASON, now)?;
        }
        Ok(ledger)
    }

    /// Rebuild a ledger from persisted entries, verifying the whole chain.
    pub fn restore(entries: Vec<LedgerEntry>) -> Result<Self, LedgerError> {
        let balance = verify_chain(&entries)?;
        Ok(Self { entries, balance })
    }

    /// Append a positive delta.
    pub fn credit(
        &mut self,
        amount: i64,
        reason: impl Into<String>,
        now: Timestamp,
    ) -> Result<LedgerEntry, LedgerError> {
        if amount <= 0 {
            return Err(LedgerError::InvalidAmount { amount });
        }
        let resulting = self
            .balance
            .checked_add(amount as u64)
            .ok_or(LedgerError::BalanceOverflow {
                balance: self.balance,
                amount: amount as u64,
            })?;
        Ok(self.append(amount, resulting, reason.into(), now))
    }

    /// Append a negative delta. Never takes the balance below zero.
    pub fn debit(
        &mut self,
        amount: i64,
        reason: impl Into<String>,
        now: Timestamp,
    ) -> Result<LedgerEntry, LedgerError> {
        if amount <= 0 {
            return Err(LedgerError::InvalidAmount { amount });
        }
        let requested = amount as u64;
        if requested > self.balance {
            return Err(LedgerError::InsufficientBalance {
                requested,
                available: self.balance,
            });
        }
        Ok(self.append(-amount, self.balance - requested, reason.into(), now))
    }

    // All validation happens before this point; append cannot fail, so the
    // entry and the balance always change together.
    fn append(
        &mut self,
        delta: i64,
        resulting_balance: u64,
        reason: String,
        now: Timestamp,
    ) -> LedgerEntry {
        let last = self.entries.last();
        let id = last.map_or(EntryId::GENESIS, |e| e.id).next();
        // Clock skew must not break the total order.
        let timestamp = last.map_or(now, |e| now.max(e.timestamp));

        let entry = LedgerEntry {
            id,
            amount: delta,
            reason,
            resulting_balance,
            timestamp,
        };
        self.entries.push(entry.clone());
        self.balance = resulting_balance;
        entry
    }

    pub fn balance(&self) -> u64 {
        self.balance
    }

    pub fn entries(&self) -> &[LedgerEntry] {
        &self.entries
    }

    /// Entries strictly after `id`.
    pub fn entries_since(&self, id: EntryId) -> &[LedgerEntry] {
        let start = self.entries.partition_point(|e| e.id <= id);
        &self.entries[start..]
    }

    pub fn last_entry(&self) -> Option<&LedgerEntry> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Re-verify the entire chain against the cached balance.
    pub fn audit(&self) -> Result<(), LedgerError> {
        let balance = verify_chain(&self.entries)?;
        if balance != self.balance || !invariant_balance_matches_sum(self.balance, &self.entries) {
            return Err(LedgerError::CorruptedHistory {
                entry: self.last_entry().map_or(EntryId::GENESIS, |e| e.id),
                detail: format!("cached balance {} != chain balance {}", self.balance, balance),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opening_balance_is_an_entry() {
        let ledger = Ledger::with_opening_balance(850, 1_000).unwrap();
        assert_eq!(ledger.balance(), 850);
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.entries()[0].reason, OPENING_BALANCE_REASON);
        assert!(ledger.audit().is_ok());
    }

    #[test]
    fn test_zero_opening_balance_is_empty() {
        let ledger = Ledger::with_opening_balance(0, 1_000).unwrap();
        assert!(ledger.is_empty());
        assert_eq!(ledger.balance(), 0);
    }

    #[test]
    fn test_credit_appends_and_updates_balance() {
        let mut ledger = Ledger::with_opening_balance(850, 1_000).unwrap();
        let entry = ledger.credit(50, "challenge completed", 2_000).unwrap();

        assert_eq!(entry.id, EntryId(2));
        assert_eq!(entry.amount, 50);
        assert_eq!(entry.resulting_balance, 900);
        assert_eq!(ledger.balance(), 900);
    }

    #[test]
    fn test_credit_rejects_non_positive() {
        let mut ledger = Ledger::new();
        assert_eq!(
            ledger.credit(0, "zero", 1),
            Err(LedgerError::InvalidAmount { amount: 0 })
        );
        assert_eq!(
            ledger.credit(-5, "negative", 1),
            Err(LedgerError::InvalidAmount { amount: -5 })
        );
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_debit_never_overdraws() {
        let mut ledger = Ledger::with_opening_balance(100, 1).unwrap();
        let err = ledger.debit(101, "too much", 2).unwrap_err();
        assert_eq!(
            err,
            LedgerError::InsufficientBalance {
                requested: 101,
                available: 100
            }
        );
        // No partial entry.
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.balance(), 100);

        let entry = ledger.debit(100, "all of it", 3).unwrap();
        assert_eq!(entry.amount, -100);
        assert_eq!(ledger.balance(), 0);
    }

    #[test]
    fn test_credit_overflow_rejected() {
        let mut ledger = Ledger::new();
        ledger.credit(i64::MAX, "big", 1).unwrap();
        ledger.credit(i64::MAX, "bigger", 2).unwrap();
        let err = ledger.credit(i64::MAX, "overflow", 3).unwrap_err();
        assert!(matches!(err, LedgerError::BalanceOverflow { .. }));
        assert_eq!(ledger.len(), 2);
    }

    #[test]
    fn test_timestamps_never_go_backwards() {
        let mut ledger = Ledger::new();
        ledger.credit(10, "a", 5_000).unwrap();
        let entry = ledger.credit(10, "b", 4_000).unwrap();
        assert_eq!(entry.timestamp, 5_000);
        assert!(ledger.audit().is_ok());
    }

    #[test]
    fn test_entries_since() {
        let mut ledger = Ledger::new();
        for i in 1..=5 {
            ledger.credit(i, "tick", i as u64).unwrap();
        }
        let tail = ledger.entries_since(EntryId(3));
        assert_eq!(tail.len(), 2);
        assert_eq!(tail[0].id, EntryId(4));
        assert!(ledger.entries_since(EntryId(5)).is_empty());
        assert_eq!(ledger.entries_since(EntryId::GENESIS).len(), 5);
    }

    #[test]
    fn test_restore_round_trips_history() {
        let mut ledger = Ledger::with_opening_balance(850, 1).unwrap();
        ledger.credit(50, "challenge completed", 2).unwrap();
        ledger.debit(25, "redeemed", 3).unwrap();

        let restored = Ledger::restore(ledger.entries().to_vec()).unwrap();
        assert_eq!(restored.balance(), 875);
        assert_eq!(restored.entries(), ledger.entries());

        // New entries continue the sequence.
        let mut restored = restored;
        let next = restored.credit(5, "check-in", 4).unwrap();
        assert_eq!(next.id, EntryId(4));
    }

    #[test]
    fn test_restore_rejects_tampered_history() {
        let mut ledger = Ledger::with_opening_balance(850, 1).unwrap();
        ledger.credit(50, "challenge completed", 2).unwrap();
        let mut entries = ledger.entries().to_vec();
        entries[1].resulting_balance = 10_000;

        assert!(matches!(
            Ledger::restore(entries),
            Err(LedgerError::CorruptedHistory { .. })
        ));
    }
}
