//! # Inbound Port - QuestEngineApi
//!
//! Primary driving port for challenge lifecycle commands and queries.

use crate::domain::{
    Challenge, CompletionOutcome, NewChallenge, ProgressOutcome, Progression, QuestError,
    ToggleOutcome,
};
use shared_types::ChallengeId;

/// Primary API for the Quest Engine subsystem.
pub trait QuestEngineApi: Send + Sync {
    /// Flip active and paused.
    ///
    /// # Errors
    /// - `NotFound`: unknown id
    fn toggle(&self, id: &ChallengeId) -> Result<ToggleOutcome, QuestError>;

    /// Complete a challenge and credit its reward.
    ///
    /// Idempotent: a completed challenge yields `AlreadyCompleted` and no
    /// credit.
    ///
    /// # Errors
    /// - `NotFound`: unknown id
    /// - `CreditFailed`: the ledger refused; the challenge is unchanged
    fn complete(&self, id: &ChallengeId) -> Result<CompletionOutcome, QuestError>;

    /// Add a user-created challenge.
    ///
    /// # Errors
    /// - `DuplicateChallenge`, `InvalidChallenge`
    fn enroll(&self, challenge: NewChallenge) -> Result<Challenge, QuestError>;

    /// Set progress on an active challenge.
    ///
    /// # Errors
    /// - `NotFound`, `NotActive`
    fn record_progress(&self, id: &ChallengeId, progress: u8)
        -> Result<ProgressOutcome, QuestError>;

    fn get(&self, id: &ChallengeId) -> Option<Challenge>;

    fn list_active(&self) -> Vec<Challenge>;

    fn list_paused(&self) -> Vec<Challenge>;

    fn list_completed(&self) -> Vec<Challenge>;

    /// Every challenge in catalog order.
    fn list_all(&self) -> Vec<Challenge>;

    fn progression(&self) -> Progression;
}
