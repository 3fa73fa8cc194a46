//! # Outbound Ports
//!
//! Driven ports the Quest Engine depends on. The runtime wires these to the
//! other subsystems.

use shared_types::{Classify, ErrorClass};
use thiserror::Error;

/// Receipt for an applied credit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CreditReceipt {
    /// Sequence number of the ledger entry.
    pub entry: u64,
    pub resulting_balance: u64,
}

/// A credit the ledger refused. Nothing was applied.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct CreditRejected {
    pub message: String,
    pub class: ErrorClass,
}

impl CreditRejected {
    pub fn new(message: impl Into<String>, class: ErrorClass) -> Self {
        Self {
            message: message.into(),
            class,
        }
    }
}

impl Classify for CreditRejected {
    fn class(&self) -> ErrorClass {
        self.class
    }
}

/// Coin ledger as seen by the Quest Engine.
pub trait CoinLedger: Send + Sync {
    /// Credit `amount` coins with an audit reason.
    fn credit(&self, amount: u64, reason: &str) -> Result<CreditReceipt, CreditRejected>;
}
