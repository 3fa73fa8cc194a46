//! # Quest Engine Service
//!
//! Wraps the `QuestBook` in a mutex and drives completions through the
//! `CoinLedger` port. The book lock is held across the credit so a second
//! completion of the same challenge observes the terminal state; lock order
//! is always quest book, then ledger.

use crate::domain::{
    Challenge, ChallengeStatus, CompletionOutcome, CompletionPlan, NewChallenge, ProgressOutcome,
    Progression, QuestBook, QuestError, ToggleOutcome, XpCurve,
};
use crate::ports::{CoinLedger, QuestEngineApi};
use parking_lot::Mutex;
use shared_types::{ChallengeId, TimeSource};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Audit reason recorded on the ledger for completion rewards.
pub const COMPLETION_REASON: &str = "challenge completed";

/// Thread-safe Quest Engine.
pub struct QuestEngineService {
    book: Mutex<QuestBook>,
    ledger: Arc<dyn CoinLedger>,
    clock: Arc<dyn TimeSource>,
}

impl QuestEngineService {
    pub fn new(
        catalog: Vec<Challenge>,
        xp: u64,
        curve: XpCurve,
        ledger: Arc<dyn CoinLedger>,
        clock: Arc<dyn TimeSource>,
    ) -> Self {
        let book = QuestBook::new(catalog, xp, curve);
        info!(
            challenges = book.len(),
            xp,
            "[eco-02] Quest book loaded"
        );
        Self {
            book: Mutex::new(book),
            ledger,
            clock,
        }
    }

    /// Total XP, for persistence.
    pub fn xp(&self) -> u64 {
        self.book.lock().xp()
    }
}

impl QuestEngineApi for QuestEngineService {
    fn toggle(&self, id: &ChallengeId) -> Result<ToggleOutcome, QuestError> {
        let outcome = self.book.lock().toggle(id)?;
        match &outcome {
            ToggleOutcome::Toggled(c) => {
                info!(challenge = %id, status = ?c.status, "[eco-02] Challenge toggled")
            }
            ToggleOutcome::AlreadyCompleted(_) => {
                debug!(challenge = %id, "[eco-02] Toggle ignored, challenge completed")
            }
        }
        Ok(outcome)
    }

    fn complete(&self, id: &ChallengeId) -> Result<CompletionOutcome, QuestError> {
        let mut book = self.book.lock();

        let coins = match book.prepare_completion(id)? {
            CompletionPlan::AlreadyCompleted(challenge) => {
                debug!(challenge = %id, "[eco-02] Completion ignored, already completed");
                return Ok(CompletionOutcome::AlreadyCompleted(challenge));
            }
            CompletionPlan::Credit { coins } => coins,
        };

        let receipt = self
            .ledger
            .credit(u64::from(coins), COMPLETION_REASON)
            .map_err(|e| {
                warn!(challenge = %id, error = %e, "[eco-02] Reward credit refused");
                QuestError::CreditFailed {
                    id: id.clone(),
                    message: e.message,
                    class: e.class,
                }
            })?;

        let reward = book.commit_completion(id, self.clock.now())?;
        info!(
            challenge = %id,
            coins = reward.coins,
            xp = reward.xp,
            entry = receipt.entry,
            balance = receipt.resulting_balance,
            level_up = ?reward.level_up,
            "[eco-02] Challenge completed"
        );
        Ok(CompletionOutcome::Completed(reward))
    }

    fn enroll(&self, challenge: NewChallenge) -> Result<Challenge, QuestError> {
        let now = self.clock.now();
        let enrolled = self.book.lock().enroll(challenge, now)?;
        info!(challenge = %enrolled.id, title = %enrolled.title, "[eco-02] Challenge enrolled");
        Ok(enrolled)
    }

    fn record_progress(
        &self,
        id: &ChallengeId,
        progress: u8,
    ) -> Result<ProgressOutcome, QuestError> {
        let outcome = self.book.lock().record_progress(id, progress)?;
        if let ProgressOutcome::Updated(c) = &outcome {
            debug!(challenge = %id, progress = c.progress, "[eco-02] Progress recorded");
        }
        Ok(outcome)
    }

    fn get(&self, id: &ChallengeId) -> Option<Challenge> {
        self.book.lock().get(id).cloned()
    }

    fn list_active(&self) -> Vec<Challenge> {
        self.book.lock().with_status(ChallengeStatus::Active)
    }

    fn list_paused(&self) -> Vec<Challenge> {
        self.book.lock().with_status(ChallengeStatus::Paused)
    }

    fn list_completed(&self) -> Vec<Challenge> {
        self.book.lock().with_status(ChallengeStatus::Completed)
    }

    fn list_all(&self) -> Vec<Challenge> {
        self.book.lock().challenges().to_vec()
    }

    fn progression(&self) -> Progression {
        self.book.lock().progression()
    }
}
