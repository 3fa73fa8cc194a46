//! Ports for the Quest Engine.

pub mod inbound;
pub mod outbound;

pub use inbound::QuestEngineApi;
pub use outbound::{CoinLedger, CreditReceipt, CreditRejected};
