//! # Reward Events
//!
//! Every state change the runtime announces to observers. Events are emitted
//! after the owning subsystem has applied the change; they are notifications,
//! never commands.

use serde::{Deserialize, Serialize};
use shared_types::{ChallengeId, CouponId, CouponNotice, RewardGranted, SubsystemId, Timestamp};

/// All events that can be published to the event bus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RewardEvent {
    // =========================================================================
    // SUBSYSTEM 1: LEDGER
    // =========================================================================
    /// A credit entry was appended.
    CoinsCredited {
        entry: u64,
        amount: u64,
        reason: String,
        balance: u64,
    },

    /// A debit entry was appended.
    CoinsDebited {
        entry: u64,
        amount: u64,
        reason: String,
        balance: u64,
    },

    // =========================================================================
    // SUBSYSTEM 2: QUEST ENGINE
    // =========================================================================
    /// First completion of a challenge; coins already credited.
    RewardGranted(RewardGranted),

    /// A challenge moved between active and paused.
    ChallengeToggled { challenge: ChallengeId, active: bool },

    /// A user-created challenge joined the catalog.
    ChallengeEnrolled { challenge: ChallengeId },

    // =========================================================================
    // SUBSYSTEM 3: COUPON REGISTRY
    // =========================================================================
    CouponIssued(CouponNotice),

    CouponRedeemed { coupon: CouponId, code: String },

    // =========================================================================
    // SUBSYSTEM 4: NOTIFICATION SCHEDULER
    // =========================================================================
    /// A notification reached the presentation layer.
    NotificationDelivered {
        notification: u64,
        /// Wire name of the notification kind, e.g. "coin-award".
        kind: String,
        chain: Option<u64>,
        delivered_at: Timestamp,
        payload: serde_json::Value,
    },

    // =========================================================================
    // RUNTIME
    // =========================================================================
    /// Daily check-in credited.
    CheckedIn { day: String, streak: u32, coins: u64 },
}

impl RewardEvent {
    /// Get the topic for this event (for filtering).
    #[must_use]
    pub fn topic(&self) -> EventTopic {
        match self {
            Self::CoinsCredited { .. } | Self::CoinsDebited { .. } => EventTopic::Ledger,
            Self::RewardGranted(_)
            | Self::ChallengeToggled { .. }
            | Self::ChallengeEnrolled { .. } => EventTopic::Quests,
            Self::CouponIssued(_) | Self::CouponRedeemed { .. } => EventTopic::Coupons,
            Self::NotificationDelivered { .. } => EventTopic::Notifications,
            Self::CheckedIn { .. } => EventTopic::Runtime,
        }
    }

    /// Get the originating subsystem.
    #[must_use]
    pub fn source_subsystem(&self) -> SubsystemId {
        match self.topic() {
            EventTopic::Ledger => SubsystemId::Ledger,
            EventTopic::Quests => SubsystemId::QuestEngine,
            EventTopic::Coupons => SubsystemId::CouponRegistry,
            EventTopic::Notifications => SubsystemId::NotificationScheduler,
            EventTopic::Runtime | EventTopic::All => SubsystemId::Runtime,
        }
    }
}

/// Event topics for subscription filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventTopic {
    /// Subsystem 1 events.
    Ledger,
    /// Subsystem 2 events.
    Quests,
    /// Subsystem 3 events.
    Coupons,
    /// Subsystem 4 events.
    Notifications,
    /// Runtime-level events (check-in).
    Runtime,
    /// All events (no filtering).
    All,
}

/// Filter for subscribing to specific events.
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    /// Topics to include. Empty means all topics.
    pub topics: Vec<EventTopic>,
    /// Source subsystems to include. Empty means all sources.
    pub source_subsystems: Vec<SubsystemId>,
}

impl EventFilter {
    /// Create a filter that accepts all events.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Create a filter for specific topics.
    #[must_use]
    pub fn topics(topics: Vec<EventTopic>) -> Self {
        Self {
            topics,
            source_subsystems: Vec::new(),
        }
    }

    /// Create a filter for events from specific subsystems.
    #[must_use]
    pub fn from_subsystems(subsystems: Vec<SubsystemId>) -> Self {
        Self {
            topics: Vec::new(),
            source_subsystems: subsystems,
        }
    }

    /// Check if an event matches this filter.
    #[must_use]
    pub fn matches(&self, event: &RewardEvent) -> bool {
        let topic_match = self.topics.is_empty()
            || self.topics.contains(&EventTopic::All)
            || self.topics.contains(&event.topic());

        let source_match = self.source_subsystems.is_empty()
            || self.source_subsystems.contains(&event.source_subsystem());

        topic_match && source_match
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credited() -> RewardEvent {
        RewardEvent::CoinsCredited {
            entry: 2,
            amount: 50,
            reason: "challenge completed".into(),
            balance: 900,
        }
    }

    fn redeemed() -> RewardEvent {
        RewardEvent::CouponRedeemed {
            coupon: "coupon-1".into(),
            code: "ECO4A2B5C".into(),
        }
    }

    #[test]
    fn test_event_topic_mapping() {
        assert_eq!(credited().topic(), EventTopic::Ledger);
        assert_eq!(credited().source_subsystem(), SubsystemId::Ledger);
        assert_eq!(redeemed().topic(), EventTopic::Coupons);
        assert_eq!(redeemed().source_subsystem(), SubsystemId::CouponRegistry);
    }

    #[test]
    fn test_filter_all() {
        assert!(EventFilter::all().matches(&credited()));
        assert!(EventFilter::topics(vec![EventTopic::All]).matches(&redeemed()));
    }

    #[test]
    fn test_filter_by_topic() {
        let filter = EventFilter::topics(vec![EventTopic::Ledger]);
        assert!(filter.matches(&credited()));
        assert!(!filter.matches(&redeemed()));
    }

    #[test]
    fn test_filter_by_subsystem() {
        let filter = EventFilter::from_subsystems(vec![SubsystemId::CouponRegistry]);
        assert!(filter.matches(&redeemed()));
        assert!(!filter.matches(&credited()));
    }

    #[test]
    fn test_check_in_is_runtime_event() {
        let event = RewardEvent::CheckedIn {
            day: "2025-01-10".into(),
            streak: 3,
            coins: 5,
        };
        assert_eq!(event.topic(), EventTopic::Runtime);
        assert_eq!(event.source_subsystem(), SubsystemId::Runtime);
    }
}
