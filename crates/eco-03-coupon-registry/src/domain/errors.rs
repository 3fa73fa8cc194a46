//! Coupon Registry error types.

use shared_types::{Classify, CouponId, ErrorClass, Timestamp};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CouponError {
    #[error("Coupon not found: {0}")]
    NotFound(CouponId),

    /// Second redemption; the first one already took effect.
    #[error("Coupon already used: {0}")]
    AlreadyUsed(CouponId),

    #[error("Coupon {id} expired at {valid_until}")]
    Expired { id: CouponId, valid_until: Timestamp },

    #[error("Invalid coupon: {reason}")]
    InvalidCoupon { reason: String },

    #[error("Could not find a free coupon code after {attempts} attempts")]
    CodeSpaceExhausted { attempts: u32 },

    #[error("Corrupted coupon state: {detail}")]
    CorruptedState { detail: String },
}

impl Classify for CouponError {
    fn class(&self) -> ErrorClass {
        match self {
            Self::AlreadyUsed(_) => ErrorClass::NoOp,
            Self::CodeSpaceExhausted { .. } => ErrorClass::Transient,
            Self::NotFound(_)
            | Self::Expired { .. }
            | Self::InvalidCoupon { .. }
            | Self::CorruptedState { .. } => ErrorClass::Rejected,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        assert!(CouponError::AlreadyUsed("c".into()).is_noop());
        assert!(!CouponError::NotFound("c".into()).is_noop());
        assert!(CouponError::CodeSpaceExhausted { attempts: 3 }.is_retryable());
        assert_eq!(
            CouponError::Expired { id: "c".into(), valid_until: 5 }.class(),
            ErrorClass::Rejected
        );
    }
}
