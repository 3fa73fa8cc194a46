//! Command results and failures as the presentation layer sees them.

use eco_01_ledger::LedgerError;
use eco_02_quest_engine::QuestError;
use eco_03_coupon_registry::CouponError;
use shared_types::{Classify, ErrorClass};
use thiserror::Error;

use crate::adapters::StoreError;
use crate::container::ConfigError;

/// Successful command result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome<T> {
    /// State changed and was persisted.
    Applied(T),
    /// Nothing happened because the request was already satisfied.
    Unchanged(NoOpReason),
}

impl<T> CommandOutcome<T> {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied(_))
    }

    pub fn applied(&self) -> Option<&T> {
        match self {
            Self::Applied(value) => Some(value),
            Self::Unchanged(_) => None,
        }
    }

    pub fn into_applied(self) -> Option<T> {
        match self {
            Self::Applied(value) => Some(value),
            Self::Unchanged(_) => None,
        }
    }

    pub(crate) fn label(&self) -> &'static str {
        match self {
            Self::Applied(_) => "applied",
            Self::Unchanged(_) => "unchanged",
        }
    }
}

/// Why a command was a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoOpReason {
    AlreadyCompleted,
    AlreadyUsed,
    AlreadyCheckedIn,
}

/// Command failures. Nothing was applied unless noted on the variant.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error(transparent)]
    Quest(#[from] QuestError),

    #[error(transparent)]
    Coupon(#[from] CouponError),

    /// The change may already be applied in memory. The next command or
    /// tick saves it again and publishes its events then.
    #[error("Storage failure: {0}")]
    Storage(#[from] StoreError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl Classify for EngineError {
    fn class(&self) -> ErrorClass {
        match self {
            Self::Ledger(e) => e.class(),
            Self::Quest(e) => e.class(),
            Self::Coupon(e) => e.class(),
            Self::Storage(e) => e.class(),
            Self::Config(_) => ErrorClass::Rejected,
        }
    }
}

impl EngineError {
    pub(crate) fn label(&self) -> &'static str {
        match self.class() {
            ErrorClass::NoOp => "unchanged",
            ErrorClass::Rejected => "rejected",
            ErrorClass::Transient => "transient",
        }
    }
}
