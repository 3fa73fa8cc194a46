//! # Domain Invariants
//!
//! Checks applied when a ledger is restored from persisted entries and by
//! `Ledger::audit()`.

use super::entities::{EntryId, LedgerEntry};
use super::errors::LedgerError;

/// Invariant: every entry links to its predecessor.
///
/// Walks the chain from a zero balance and returns the final balance.
/// Ids must be strictly increasing, timestamps non-decreasing, each
/// `resulting_balance` must equal the running balance plus `amount`, and the
/// running balance may never go negative.
pub fn verify_chain(entries: &[LedgerEntry]) -> Result<u64, LedgerError> {
    let mut balance: i128 = 0;
    let mut last_id = EntryId::GENESIS;
    let mut last_ts = 0;

    for entry in entries {
        let corrupt = |detail: String| LedgerError::CorruptedHistory {
            entry: entry.id,
            detail,
        };

        if entry.id <= last_id {
            return Err(corrupt(format!("id not after {}", last_id)));
        }
        if entry.timestamp < last_ts {
            return Err(corrupt(format!(
                "timestamp {} before previous {}",
                entry.timestamp, last_ts
            )));
        }
        if entry.amount == 0 {
            return Err(corrupt("zero amount".to_string()));
        }

        balance += entry.amount as i128;
        if balance < 0 {
            return Err(corrupt(format!("balance would be {}", balance)));
        }
        if balance != entry.resulting_balance as i128 {
            return Err(corrupt(format!(
                "resulting balance {} != expected {}",
                entry.resulting_balance, balance
            )));
        }

        last_id = entry.id;
        last_ts = entry.timestamp;
    }

    u64::try_from(balance).map_err(|_| LedgerError::CorruptedHistory {
        entry: last_id,
        detail: "balance out of range".to_string(),
    })
}

/// Invariant: balance equals the sum of all entry amounts.
pub fn invariant_balance_matches_sum(balance: u64, entries: &[LedgerEntry]) -> bool {
    let sum: i128 = entries.iter().map(|e| e.amount as i128).sum();
    sum == balance as i128
}
