//! # Domain Layer - Ledger Subsystem
//!
//! Pure business logic, no locking and no clock reads.

pub mod entities;
pub mod errors;
pub mod invariants;
pub mod ledger;

pub use entities::*;
pub use errors::*;
pub use invariants::*;
pub use ledger::*;
