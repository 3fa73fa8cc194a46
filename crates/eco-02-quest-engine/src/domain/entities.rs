//! # Domain Entities
//!
//! The challenge record and its enums.

use serde::{Deserialize, Serialize};
use shared_types::{ChallengeId, Timestamp};

/// Upper bound of `Challenge::progress`.
pub const MAX_PROGRESS: u8 = 100;

/// Challenge difficulty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

/// Lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChallengeStatus {
    Active,
    Paused,
    Completed,
}

impl ChallengeStatus {
    /// Status reached by a toggle, or `None` for the terminal state.
    pub fn toggled(self) -> Option<ChallengeStatus> {
        match self {
            Self::Active => Some(Self::Paused),
            Self::Paused => Some(Self::Active),
            Self::Completed => None,
        }
    }
}

/// Where a challenge record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ChallengeOrigin {
    /// Built-in catalog default.
    Seed,
    /// Enrolled by the user.
    #[default]
    User,
}

/// A trackable goal with progress and a terminal completion state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Challenge {
    pub id: ChallengeId,
    pub title: String,
    pub description: String,
    pub category: String,
    pub difficulty: Difficulty,
    /// Coins credited on completion.
    pub reward_coins: u32,
    /// Experience granted on completion.
    pub reward_xp: u32,
    /// Human-readable duration, e.g. "5 days".
    pub target_duration: String,
    #[serde(default)]
    pub icon: String,
    /// Percentage in [0, 100].
    pub progress: u8,
    pub status: ChallengeStatus,
    #[serde(default)]
    pub origin: ChallengeOrigin,
    #[serde(default)]
    pub accepted_at: Option<Timestamp>,
    #[serde(default)]
    pub completed_at: Option<Timestamp>,
}

impl Challenge {
    pub fn is_completed(&self) -> bool {
        self.status == ChallengeStatus::Completed
    }

    pub fn is_active(&self) -> bool {
        self.status == ChallengeStatus::Active
    }

    /// Clamp progress and pin completed records at 100.
    ///
    /// Applied to every record entering the engine from outside (seed or
    /// persisted state).
    pub fn normalized(mut self) -> Self {
        self.progress = self.progress.min(MAX_PROGRESS);
        if self.is_completed() {
            self.progress = MAX_PROGRESS;
        }
        self
    }
}

/// A user-created challenge before enrollment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewChallenge {
    pub id: ChallengeId,
    pub title: String,
    pub description: String,
    pub category: String,
    pub difficulty: Difficulty,
    pub reward_coins: u32,
    pub reward_xp: u32,
    pub target_duration: String,
    #[serde(default)]
    pub icon: String,
    /// Starting progress, for challenges enrolled part-way through.
    #[serde(default)]
    pub progress: u8,
}

impl NewChallenge {
    /// Materialize as an active, user-origin challenge.
    pub fn into_challenge(self, accepted_at: Timestamp) -> Challenge {
        Challenge {
            id: self.id,
            title: self.title,
            description: self.description,
            category: self.category,
            difficulty: self.difficulty,
            reward_coins: self.reward_coins,
            reward_xp: self.reward_xp,
            target_duration: self.target_duration,
            icon: self.icon,
            progress: self.progress,
            status: ChallengeStatus::Active,
            origin: ChallengeOrigin::User,
            accepted_at: Some(accepted_at),
            completed_at: None,
        }
    }
}
