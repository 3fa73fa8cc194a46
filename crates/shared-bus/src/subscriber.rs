//! Receiving side of the bus.

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::broadcast::{self, error::RecvError, error::TryRecvError};
use tracing::{debug, warn};

use crate::events::{EventFilter, RewardEvent};
use crate::publisher::BusStats;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SubscriptionError {
    #[error("Event bus closed")]
    Closed,
}

pub trait EventSubscriber: Send + Sync {
    fn subscribe(&self, filter: EventFilter) -> Subscription;
}

/// Filtered stream of bus events. Counts itself out of the bus on drop.
pub struct Subscription {
    receiver: broadcast::Receiver<RewardEvent>,
    filter: EventFilter,
    stats: Arc<BusStats>,
}

impl Subscription {
    pub(crate) fn new(
        receiver: broadcast::Receiver<RewardEvent>,
        filter: EventFilter,
        stats: Arc<BusStats>,
    ) -> Self {
        stats.record_open();
        Self {
            receiver,
            filter,
            stats,
        }
    }

    /// Next matching event, or `None` once the bus is gone.
    pub async fn recv(&mut self) -> Option<RewardEvent> {
        loop {
            match self.receiver.recv().await {
                Ok(event) if self.filter.matches(&event) => return Some(event),
                Ok(_) => {}
                Err(RecvError::Lagged(skipped)) => self.lagged(skipped),
                Err(RecvError::Closed) => return None,
            }
        }
    }

    /// Next matching event if one is buffered.
    pub fn try_recv(&mut self) -> Result<Option<RewardEvent>, SubscriptionError> {
        loop {
            match self.receiver.try_recv() {
                Ok(event) if self.filter.matches(&event) => return Ok(Some(event)),
                Ok(_) => {}
                Err(TryRecvError::Lagged(skipped)) => self.lagged(skipped),
                Err(TryRecvError::Empty) => return Ok(None),
                Err(TryRecvError::Closed) => return Err(SubscriptionError::Closed),
            }
        }
    }

    /// Every matching event buffered right now, in publish order.
    pub fn drain(&mut self) -> Vec<RewardEvent> {
        std::iter::from_fn(|| self.try_recv().ok().flatten()).collect()
    }

    #[must_use]
    pub fn filter(&self) -> &EventFilter {
        &self.filter
    }

    fn lagged(&self, skipped: u64) {
        warn!(skipped, "[bus] Subscriber lagged, events skipped");
        self.stats.record_skipped(skipped);
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.stats.record_close();
        debug!(topics = ?self.filter.topics, "[bus] Unsubscribed");
    }
}
