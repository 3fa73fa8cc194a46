//! # Quest Engine Subsystem
//!
//! **Subsystem ID:** 2
//! **Status:** Production-Ready
//!
//! ## Purpose
//!
//! Owns the challenge catalog and its lifecycle. Completing a challenge
//! credits its coin reward through the `CoinLedger` port and yields a
//! `RewardGranted` event; the engine never touches ledger state directly.
//!
//! ## State Machine
//!
//! ```text
//! [ACTIVE] ⇄ toggle ⇄ [PAUSED]
//!    │                    │
//!    └──── complete ──────┴──→ [COMPLETED]  (terminal, progress pinned at 100)
//! ```
//!
//! ## Domain Invariants
//!
//! | ID | Invariant | Enforcement Location |
//! |----|-----------|---------------------|
//! | INVARIANT-1 | Completed is terminal | `domain/quest_book.rs` - `toggle()`, `prepare_completion()` |
//! | INVARIANT-2 | One credit per challenge | `service.rs` - completion under the book lock |
//! | INVARIANT-3 | No completion without credit | `service.rs` - commit only after `CoinLedger::credit` succeeds |
//! | INVARIANT-4 | Stable catalog order | `domain/catalog.rs` - `merge_catalog()` |
//! | INVARIANT-5 | Reload never resurrects a completed record | `domain/catalog.rs` - `should_replace()` |
//!
//! ## Outbound Dependencies
//!
//! | Subsystem | Trait | Purpose |
//! |-----------|-------|---------|
//! | 1 (Ledger) | `CoinLedger` | Credit completion rewards |

pub mod domain;
pub mod ports;
pub mod service;

pub use domain::*;
pub use ports::{CoinLedger, CreditReceipt, CreditRejected, QuestEngineApi};
pub use service::QuestEngineService;
