//! # Domain Entities

use serde::{Deserialize, Serialize};
use shared_types::{CouponNotice, RewardGranted, Timestamp};
use std::fmt;

/// Notification sequence number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NotificationId(pub u64);

impl fmt::Display for NotificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

/// Handle to one reward chain, used for cancellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChainHandle(pub u64);

impl fmt::Display for ChainHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "chain-{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NotificationKind {
    CoinAward,
    CouponUnlock,
    Achievement,
}

impl NotificationKind {
    /// Wire name, matching the serde representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CoinAward => "coin-award",
            Self::CouponUnlock => "coupon-unlock",
            Self::Achievement => "achievement",
        }
    }
}

/// What a notification says.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NotificationPayload {
    Coins { amount: u64, reason: String },
    Level { level: u32, title: String },
    Coupon(CouponNotice),
}

/// What a queued step does when it comes due.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepAction {
    /// Announce a ready payload.
    Announce(NotificationPayload),
    /// Ask the registry for the reward coupon, then announce it.
    UnlockCoupon(RewardGranted),
}

/// A queued step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledStep {
    pub id: NotificationId,
    pub kind: NotificationKind,
    pub action: StepAction,
    pub chain: Option<ChainHandle>,
    pub enqueued_at: Timestamp,
    pub due_at: Timestamp,
}

/// A step waiting for its predecessor in the chain to be delivered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainStep {
    pub kind: NotificationKind,
    /// Delay after the previous step's delivery.
    pub delay_ms: u64,
    pub action: StepAction,
}

/// A notification as handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveredNotification {
    pub id: NotificationId,
    pub kind: NotificationKind,
    pub payload: NotificationPayload,
    pub enqueued_at: Timestamp,
    pub delivered_at: Timestamp,
    pub chain: Option<ChainHandle>,
}

/// Reward chain timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChainTiming {
    /// Delay from the triggering action to the coin award.
    pub coin_delay_ms: u64,
    /// Delay from the previous delivery to the coupon unlock.
    pub coupon_delay_ms: u64,
}

impl Default for ChainTiming {
    fn default() -> Self {
        Self {
            coin_delay_ms: 100,
            coupon_delay_ms: 2_000,
        }
    }
}

impl ChainTiming {
    /// Steps announcing a reward, in delivery order.
    pub fn reward_steps(&self, reward: &RewardGranted) -> Vec<ChainStep> {
        let mut steps = vec![ChainStep {
            kind: NotificationKind::CoinAward,
            delay_ms: self.coin_delay_ms,
            action: StepAction::Announce(NotificationPayload::Coins {
                amount: reward.coins,
                reason: format!("Completed: {}", reward.challenge_title),
            }),
        }];
        if let Some(level) = reward.level_up {
            steps.push(ChainStep {
                kind: NotificationKind::Achievement,
                delay_ms: 0,
                action: StepAction::Announce(NotificationPayload::Level {
                    level,
                    title: format!("Level {level} reached"),
                }),
            });
        }
        steps.push(ChainStep {
            kind: NotificationKind::CouponUnlock,
            delay_ms: self.coupon_delay_ms,
            action: StepAction::UnlockCoupon(reward.clone()),
        });
        steps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reward(level_up: Option<u32>) -> RewardGranted {
        RewardGranted {
            coins: 50,
            xp: 100,
            source_challenge: "c1".into(),
            challenge_title: "Solar".into(),
            granted_at: 0,
            level_up,
        }
    }

    #[test]
    fn test_kind_wire_name_matches_serde() {
        for kind in [
            NotificationKind::CoinAward,
            NotificationKind::CouponUnlock,
            NotificationKind::Achievement,
        ] {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.as_str()));
        }
    }

    #[test]
    fn test_reward_steps_without_level_up() {
        let kinds: Vec<_> = ChainTiming::default()
            .reward_steps(&reward(None))
            .into_iter()
            .map(|s| (s.kind, s.delay_ms))
            .collect();
        assert_eq!(
            kinds,
            [
                (NotificationKind::CoinAward, 100),
                (NotificationKind::CouponUnlock, 2_000)
            ]
        );
    }

    #[test]
    fn test_achievement_sits_between_coin_and_coupon() {
        let steps = ChainTiming::default().reward_steps(&reward(Some(4)));
        assert_eq!(steps.len(), 3);
        assert_eq!(steps[1].kind, NotificationKind::Achievement);
        assert_eq!(steps[1].delay_ms, 0);
    }

    #[test]
    fn test_kind_wire_names() {
        assert_eq!(
            serde_json::to_string(&NotificationKind::CouponUnlock).unwrap(),
            "\"coupon-unlock\""
        );
    }
}
