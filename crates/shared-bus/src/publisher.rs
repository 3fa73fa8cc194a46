//! Publishing side of the bus.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::broadcast;
use tracing::{debug, trace};

use crate::events::{EventFilter, EventTopic, RewardEvent};
use crate::subscriber::{EventSubscriber, Subscription};
use crate::DEFAULT_CHANNEL_CAPACITY;

#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Broadcast `event`. Returns how many subscriptions were reached,
    /// before filtering.
    async fn publish(&self, event: RewardEvent) -> usize;

    /// Events published so far, listened to or not.
    fn events_published(&self) -> u64;
}

#[derive(Debug, Default)]
struct Counters {
    published: HashMap<EventTopic, u64>,
    open_subscriptions: usize,
    skipped: u64,
}

/// Counters shared by the bus and its subscriptions.
#[derive(Debug, Default)]
pub struct BusStats {
    counters: Mutex<Counters>,
}

impl BusStats {
    pub fn published(&self, topic: EventTopic) -> u64 {
        let counters = self.counters.lock();
        match topic {
            EventTopic::All => counters.published.values().sum(),
            topic => counters.published.get(&topic).copied().unwrap_or(0),
        }
    }

    pub fn open_subscriptions(&self) -> usize {
        self.counters.lock().open_subscriptions
    }

    /// Events lost by lagging subscribers, summed over all of them.
    pub fn skipped(&self) -> u64 {
        self.counters.lock().skipped
    }

    fn record_publish(&self, topic: EventTopic) {
        *self.counters.lock().published.entry(topic).or_insert(0) += 1;
    }

    pub(crate) fn record_open(&self) {
        self.counters.lock().open_subscriptions += 1;
    }

    pub(crate) fn record_close(&self) {
        let mut counters = self.counters.lock();
        counters.open_subscriptions = counters.open_subscriptions.saturating_sub(1);
    }

    pub(crate) fn record_skipped(&self, count: u64) {
        self.counters.lock().skipped += count;
    }
}

/// Bus backed by a `tokio::sync::broadcast` channel.
pub struct InMemoryEventBus {
    sender: broadcast::Sender<RewardEvent>,
    stats: Arc<BusStats>,
    capacity: usize,
}

impl InMemoryEventBus {
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    /// Bus buffering `capacity` events per subscriber (at least one).
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender,
            stats: Arc::new(BusStats::default()),
            capacity,
        }
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[must_use]
    pub fn stats(&self) -> &BusStats {
        &self.stats
    }
}

impl Default for InMemoryEventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSubscriber for InMemoryEventBus {
    fn subscribe(&self, filter: EventFilter) -> Subscription {
        debug!(topics = ?filter.topics, "[bus] Subscribed");
        Subscription::new(self.sender.subscribe(), filter, self.stats.clone())
    }
}

#[async_trait]
impl EventPublisher for InMemoryEventBus {
    async fn publish(&self, event: RewardEvent) -> usize {
        let topic = event.topic();
        let source = event.source_subsystem().name();
        self.stats.record_publish(topic);

        match self.sender.send(event) {
            Ok(receivers) => {
                debug!(?topic, source, receivers, "[bus] Event published");
                receivers
            }
            Err(_) => {
                trace!(?topic, source, "[bus] No subscribers, event dropped");
                0
            }
        }
    }

    fn events_published(&self) -> u64 {
        self.stats.published(EventTopic::All)
    }
}
