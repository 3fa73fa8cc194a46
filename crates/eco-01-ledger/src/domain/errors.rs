//! Ledger error types.

use super::entities::EntryId;
use shared_types::{Classify, ErrorClass};
use thiserror::Error;

/// All errors that can occur in the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// Credit or debit amount was zero or negative.
    #[error("Invalid amount: {amount} (must be positive)")]
    InvalidAmount { amount: i64 },

    /// Debit exceeds the current balance.
    #[error("Insufficient balance: requested {requested}, available {available}")]
    InsufficientBalance { requested: u64, available: u64 },

    /// Credit would overflow the balance.
    #[error("Balance overflow: {balance} + {amount}")]
    BalanceOverflow { balance: u64, amount: u64 },

    /// A persisted entry list failed verification.
    #[error("Corrupted ledger history at entry {entry}: {detail}")]
    CorruptedHistory { entry: EntryId, detail: String },
}

impl Classify for LedgerError {
    fn class(&self) -> ErrorClass {
        ErrorClass::Rejected
    }
}
