//! Ports for the Ledger subsystem.

pub mod inbound;

pub use inbound::LedgerApi;
