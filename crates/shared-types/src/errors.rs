//! # Error Classification
//!
//! Every subsystem error is classified so callers can tell "nothing happened
//! because you already did this" apart from "this failed".

use serde::{Deserialize, Serialize};

/// How a caller should treat a failed operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorClass {
    /// Idempotence or lifecycle guard: the request was already satisfied.
    NoOp,
    /// The request is invalid in the current state; retrying will not help.
    Rejected,
    /// Infrastructure failure; the same request may succeed later.
    Transient,
}

/// Implemented by every subsystem error enum.
pub trait Classify {
    fn class(&self) -> ErrorClass;

    fn is_noop(&self) -> bool {
        self.class() == ErrorClass::NoOp
    }

    fn is_retryable(&self) -> bool {
        self.class() == ErrorClass::Transient
    }
}
