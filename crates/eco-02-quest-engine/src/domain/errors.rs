//! Quest Engine error types.

use super::entities::ChallengeStatus;
use shared_types::{ChallengeId, Classify, ErrorClass};
use thiserror::Error;

/// Quest Engine errors.
///
/// Completed-challenge guards are not errors; they surface as the
/// `AlreadyCompleted` arm of the command outcomes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuestError {
    #[error("Challenge not found: {0}")]
    NotFound(ChallengeId),

    #[error("Challenge already exists: {0}")]
    DuplicateChallenge(ChallengeId),

    #[error("Invalid challenge: {reason}")]
    InvalidChallenge { reason: String },

    #[error("Challenge {id} is {status:?}, expected Active")]
    NotActive {
        id: ChallengeId,
        status: ChallengeStatus,
    },

    /// The ledger refused the completion credit; the challenge is unchanged.
    #[error("Reward credit for {id} failed: {message}")]
    CreditFailed {
        id: ChallengeId,
        message: String,
        class: ErrorClass,
    },
}

impl QuestError {
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidChallenge {
            reason: reason.into(),
        }
    }
}

impl Classify for QuestError {
    fn class(&self) -> ErrorClass {
        match self {
            Self::CreditFailed { class, .. } => *class,
            Self::NotFound(_)
            | Self::DuplicateChallenge(_)
            | Self::InvalidChallenge { .. }
            | Self::NotActive { .. } => ErrorClass::Rejected,
        }
    }
}
