//! # Ledger Adapter
//!
//! Implements the Quest Engine's `CoinLedger` port on top of the Ledger
//! service. Amounts cross from the port's unsigned coins into the ledger's
//! signed deltas here.

use std::sync::Arc;

use eco_01_ledger::{LedgerApi, LedgerService};
use eco_02_quest_engine::{CoinLedger, CreditReceipt, CreditRejected};
use shared_types::{Classify, ErrorClass};

pub struct LedgerAdapter {
    ledger: Arc<LedgerService>,
}

impl LedgerAdapter {
    pub fn new(ledger: Arc<LedgerService>) -> Self {
        Self { ledger }
    }
}

impl CoinLedger for LedgerAdapter {
    fn credit(&self, amount: u64, reason: &str) -> Result<CreditReceipt, CreditRejected> {
        let delta = i64::try_from(amount).map_err(|_| {
            CreditRejected::new(
                format!("credit of {amount} exceeds the ledger range"),
                ErrorClass::Rejected,
            )
        })?;
        let entry = self
            .ledger
            .credit(delta, reason)
            .map_err(|e| CreditRejected::new(e.to_string(), e.class()))?;
        Ok(CreditReceipt {
            entry: entry.id.0,
            resulting_balance: entry.resulting_balance,
        })
    }
}
