//! # Quest Book
//!
//! Ordered challenge collection plus the XP counter. All lifecycle rules live
//! here; the service adds locking and the ledger call.

use super::catalog::merge_catalog;
use super::entities::{Challenge, ChallengeStatus, NewChallenge, MAX_PROGRESS};
use super::errors::QuestError;
use super::value_objects::{ProgressOutcome, Progression, ToggleOutcome, XpCurve};
use shared_types::{ChallengeId, RewardGranted, Timestamp};
use std::collections::HashMap;

/// What `complete` has to do for a challenge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionPlan {
    /// Credit `coins`, then call `commit_completion`.
    Credit { coins: u32 },
    AlreadyCompleted(Challenge),
}

/// The challenge collection, keyed by id, in catalog order.
#[derive(Debug, Clone)]
pub struct QuestBook {
    challenges: Vec<Challenge>,
    index: HashMap<ChallengeId, usize>,
    xp: u64,
    curve: XpCurve,
}

impl QuestBook {
    /// Book over a catalog. Records pass through the merge so ids are unique.
    pub fn new(catalog: Vec<Challenge>, xp: u64, curve: XpCurve) -> Self {
        let challenges = merge_catalog(Vec::new(), catalog);
        let index = challenges
            .iter()
            .enumerate()
            .map(|(i, c)| (c.id.clone(), i))
            .collect();
        Self {
            challenges,
            index,
            xp,
            curve,
        }
    }

    pub fn get(&self, id: &ChallengeId) -> Option<&Challenge> {
        self.index.get(id).map(|&i| &self.challenges[i])
    }

    fn position(&self, id: &ChallengeId) -> Result<usize, QuestError> {
        self.index
            .get(id)
            .copied()
            .ok_or_else(|| QuestError::NotFound(id.clone()))
    }

    /// All challenges in catalog order.
    pub fn challenges(&self) -> &[Challenge] {
        &self.challenges
    }

    pub fn with_status(&self, status: ChallengeStatus) -> Vec<Challenge> {
        self.challenges
            .iter()
            .filter(|c| c.status == status)
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.challenges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.challenges.is_empty()
    }

    pub fn xp(&self) -> u64 {
        self.xp
    }

    pub fn progression(&self) -> Progression {
        self.curve.progression(self.xp)
    }

    /// Flip active and paused.
    pub fn toggle(&mut self, id: &ChallengeId) -> Result<ToggleOutcome, QuestError> {
        let pos = self.position(id)?;
        let challenge = &mut self.challenges[pos];
        match challenge.status.toggled() {
            Some(next) => {
                challenge.status = next;
                Ok(ToggleOutcome::Toggled(challenge.clone()))
            }
            None => Ok(ToggleOutcome::AlreadyCompleted(challenge.clone())),
        }
    }

    /// Add a user-created challenge at the end of the catalog.
    pub fn enroll(&mut self, draft: NewChallenge, now: Timestamp) -> Result<Challenge, QuestError> {
        if draft.id.is_blank() {
            return Err(QuestError::invalid("id must not be empty"));
        }
        if draft.title.trim().is_empty() {
            return Err(QuestError::invalid("title must not be empty"));
        }
        if draft.progress > MAX_PROGRESS {
            return Err(QuestError::invalid(format!(
                "progress {} outside [0, {MAX_PROGRESS}]",
                draft.progress
            )));
        }
        if draft.reward_coins == 0 {
            return Err(QuestError::invalid("reward must be at least one coin"));
        }
        if self.index.contains_key(&draft.id) {
            return Err(QuestError::DuplicateChallenge(draft.id));
        }

        let challenge = draft.into_challenge(now);
        self.index.insert(challenge.id.clone(), self.challenges.len());
        self.challenges.push(challenge.clone());
        Ok(challenge)
    }

    /// Set progress on an active challenge, clamped to 100.
    ///
    /// Reaching 100 does not complete the challenge.
    pub fn record_progress(
        &mut self,
        id: &ChallengeId,
        progress: u8,
    ) -> Result<ProgressOutcome, QuestError> {
        let pos = self.position(id)?;
        let challenge = &mut self.challenges[pos];
        match challenge.status {
            ChallengeStatus::Completed => Ok(ProgressOutcome::AlreadyCompleted(challenge.clone())),
            ChallengeStatus::Paused => Err(QuestError::NotActive {
                id: id.clone(),
                status: challenge.status,
            }),
            ChallengeStatus::Active => {
                challenge.progress = progress.min(MAX_PROGRESS);
                Ok(ProgressOutcome::Updated(challenge.clone()))
            }
        }
    }

    /// First half of a completion: decide whether coins must be credited.
    pub fn prepare_completion(&self, id: &ChallengeId) -> Result<CompletionPlan, QuestError> {
        let challenge = &self.challenges[self.position(id)?];
        if challenge.is_completed() {
            return Ok(CompletionPlan::AlreadyCompleted(challenge.clone()));
        }
        Ok(CompletionPlan::Credit {
            coins: challenge.reward_coins,
        })
    }

    /// Second half of a completion, after the credit was applied.
    ///
    /// Marks the challenge terminal, adds XP, and builds the reward event.
    pub fn commit_completion(
        &mut self,
        id: &ChallengeId,
        now: Timestamp,
    ) -> Result<RewardGranted, QuestError> {
        let pos = self.position(id)?;
        let level_before = self.curve.level_for(self.xp);

        let challenge = &mut self.challenges[pos];
        challenge.status = ChallengeStatus::Completed;
        challenge.progress = MAX_PROGRESS;
        challenge.completed_at = Some(now);

        let reward = RewardGranted {
            coins: u64::from(challenge.reward_coins),
            xp: u64::from(challenge.reward_xp),
            source_challenge: challenge.id.clone(),
            challenge_title: challenge.title.clone(),
            granted_at: now,
            level_up: None,
        };

        self.xp = self.xp.saturating_add(reward.xp);
        let level_after = self.curve.level_for(self.xp);

        Ok(RewardGranted {
            level_up: (level_after > level_before).then_some(level_after),
            ..reward
        })
    }
}
