//! # Eco-Coin Ledger Subsystem
//!
//! **Subsystem ID:** 1
//! **Status:** Production-Ready
//!
//! ## Purpose
//!
//! Owns the user's eco-coin balance. Every balance change is an immutable,
//! append-only `LedgerEntry`; the balance is never written any other way.
//!
//! ## Domain Invariants
//!
//! | ID | Invariant | Enforcement Location |
//! |----|-----------|---------------------|
//! | INVARIANT-1 | Balance == sum of entry amounts | `domain/ledger.rs` - `append()` |
//! | INVARIANT-2 | `resulting_balance == previous + amount` | `domain/ledger.rs` - `append()` |
//! | INVARIANT-3 | Balance never negative | `domain/ledger.rs` - `debit()` |
//! | INVARIANT-4 | Entry ids strictly increasing, timestamps non-decreasing | `domain/invariants.rs` |
//!
//! ## Deduplication
//!
//! The ledger does NOT deduplicate. A reason string is audit text only;
//! at-most-once effects (e.g. one credit per challenge completion) are the
//! caller's responsibility.
//!
//! ## Module Structure (Hexagonal Architecture)
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  service.rs        - LedgerService (lock + clock around Ledger) │
//! └─────────────────────────────────────────────────────────────────┘
//!                          ↑ implements ↑
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  ports/inbound.rs  - LedgerApi trait                            │
//! └─────────────────────────────────────────────────────────────────┘
//!                          ↑ uses ↑
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  domain/entities.rs   - LedgerEntry, EntryId                    │
//! │  domain/ledger.rs     - Ledger (append-only core)               │
//! │  domain/invariants.rs - chain verification                      │
//! │  domain/errors.rs     - LedgerError                             │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod domain;
pub mod ports;
pub mod service;

pub use domain::*;
pub use ports::LedgerApi;
pub use service::LedgerService;
