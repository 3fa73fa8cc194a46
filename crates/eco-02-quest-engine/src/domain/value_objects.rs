//! # Value Objects
//!
//! Command outcomes and the XP progression view.

use super::entities::Challenge;
use serde::{Deserialize, Serialize};
use shared_types::RewardGranted;

/// XP required per level.
pub const DEFAULT_XP_PER_LEVEL: u64 = 500;

/// XP a fresh profile starts with.
pub const DEFAULT_STARTING_XP: u64 = 1250;

/// Result of `complete`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionOutcome {
    /// First completion; coins were credited.
    Completed(RewardGranted),
    /// Already terminal; nothing changed.
    AlreadyCompleted(Challenge),
}

/// Result of `toggle`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToggleOutcome {
    Toggled(Challenge),
    AlreadyCompleted(Challenge),
}

/// Result of `record_progress`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressOutcome {
    Updated(Challenge),
    AlreadyCompleted(Challenge),
}

/// Level curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct XpCurve {
    pub xp_per_level: u64,
}

impl Default for XpCurve {
    fn default() -> Self {
        Self {
            xp_per_level: DEFAULT_XP_PER_LEVEL,
        }
    }
}

impl XpCurve {
    /// Level for a total XP value; level 1 starts at zero XP.
    pub fn level_for(&self, xp: u64) -> u32 {
        let per = self.xp_per_level.max(1);
        u32::try_from(xp / per).unwrap_or(u32::MAX - 1) + 1
    }

    pub fn progression(&self, xp: u64) -> Progression {
        let per = self.xp_per_level.max(1);
        Progression {
            xp,
            level: self.level_for(xp),
            xp_into_level: xp % per,
            xp_per_level: per,
        }
    }
}

/// Snapshot of the XP counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progression {
    pub xp: u64,
    pub level: u32,
    pub xp_into_level: u64,
    pub xp_per_level: u64,
}

impl Progression {
    /// Percentage through the current level, for progress bars.
    pub fn level_percent(&self) -> u8 {
        ((self.xp_into_level * 100) / self.xp_per_level) as u8
    }
}
