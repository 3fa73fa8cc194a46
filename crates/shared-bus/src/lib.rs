//! # Shared Bus
//!
//! In-process broadcast of reward events. The runtime publishes after a
//! command is applied and persisted; the presentation layer, telemetry and
//! tests subscribe with a topic filter.
//!
//! ```text
//! RewardsEngine ──publish()──→ InMemoryEventBus ──→ Subscription (filter)
//!                                      │
//!                                      └──→ BusStats (per-topic counters)
//! ```
//!
//! Delivery is best effort. A subscriber that falls more than the channel
//! capacity behind skips events and the skip is counted in [`BusStats`].
//! Nothing durable is carried only on the bus.

#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod events;
pub mod publisher;
pub mod subscriber;

pub use events::{EventFilter, EventTopic, RewardEvent};
pub use publisher::{BusStats, EventPublisher, InMemoryEventBus};
pub use subscriber::{EventSubscriber, Subscription, SubscriptionError};

/// Events buffered per subscriber before it starts lagging.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 256;
