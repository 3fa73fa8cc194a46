//! # Inbound Port - LedgerApi
//!
//! Primary driving port exposing the ledger to the other subsystems and the
//! runtime facade.

use crate::domain::{EntryId, LedgerEntry, LedgerError};

/// Primary API for the Ledger subsystem.
///
/// Implementations serialize all mutations; a successful call has applied
/// exactly one entry and a failed call has applied none.
pub trait LedgerApi: Send + Sync {
    /// Credits a positive amount.
    ///
    /// # Errors
    /// - `InvalidAmount`: amount ≤ 0
    /// - `BalanceOverflow`: balance would exceed `u64::MAX`
    fn credit(&self, amount: i64, reason: &str) -> Result<LedgerEntry, LedgerError>;

    /// Debits a positive amount.
    ///
    /// # Errors
    /// - `InvalidAmount`: amount ≤ 0
    /// - `InsufficientBalance`: amount > current balance
    fn debit(&self, amount: i64, reason: &str) -> Result<LedgerEntry, LedgerError>;

    /// Current balance, consistent with the latest applied entry.
    fn balance(&self) -> u64;

    /// Full ordered entry history.
    fn entries(&self) -> Vec<LedgerEntry>;

    /// Entries strictly after `id`.
    fn entries_since(&self, id: EntryId) -> Vec<LedgerEntry>;
}
