//! # Core Domain Entities
//!
//! Identifiers and events that flow between the reward subsystems.
//!
//! ## Clusters
//!
//! - **Identity**: `ChallengeId`, `CouponId`, `SubsystemId`
//! - **Rewards**: `RewardGranted` (Quest Engine → Coupon Registry / Scheduler)
//! - **Coupons**: `CouponNotice` (Coupon Registry → Scheduler → presentation)

use serde::{Deserialize, Serialize};
use std::fmt;

/// Milliseconds since the Unix epoch.
pub type Timestamp = u64;

/// One day in milliseconds.
pub const DAY_MS: u64 = 24 * 60 * 60 * 1000;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wrap a raw identifier.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Borrow the raw identifier.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// True if the identifier is empty or whitespace.
            pub fn is_blank(&self) -> bool {
                self.0.trim().is_empty()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }
    };
}

string_id!(
    /// Identifier of a challenge (quest) in the catalog.
    ChallengeId
);

string_id!(
    /// Identifier of an issued coupon.
    CouponId
);

/// Subsystem identifiers used as event sources on the bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum SubsystemId {
    /// Runtime facade (commands that span subsystems).
    Runtime = 0,
    /// Eco-coin ledger.
    Ledger = 1,
    /// Quest / challenge engine.
    QuestEngine = 2,
    /// Coupon registry.
    CouponRegistry = 3,
    /// Notification scheduler.
    NotificationScheduler = 4,
}

impl SubsystemId {
    /// Numeric id.
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Short name for log fields.
    pub fn name(self) -> &'static str {
        match self {
            Self::Runtime => "runtime",
            Self::Ledger => "ledger",
            Self::QuestEngine => "quest-engine",
            Self::CouponRegistry => "coupon-registry",
            Self::NotificationScheduler => "notification-scheduler",
        }
    }
}

/// Emitted exactly once per challenge, on its first completion.
///
/// The coins have already been credited to the ledger by the time this event
/// exists; consumers only announce it or derive further state (coupons).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardGranted {
    /// Coins credited for the completion.
    pub coins: u64,
    /// Experience points granted.
    pub xp: u64,
    /// Challenge whose completion produced the reward.
    pub source_challenge: ChallengeId,
    /// Display title of the challenge.
    pub challenge_title: String,
    /// When the completion was committed.
    pub granted_at: Timestamp,
    /// New level, if this completion crossed a level boundary.
    pub level_up: Option<u32>,
}

/// Presentation-facing summary of an issued coupon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CouponNotice {
    pub coupon_id: CouponId,
    pub brand_name: String,
    pub discount_label: String,
    pub code: String,
    pub valid_until: Timestamp,
    pub earned_from: Option<ChallengeId>,
}
