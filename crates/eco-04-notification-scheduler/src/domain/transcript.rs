//! Bounded log of delivered notifications.

use super::entities::DeliveredNotification;
use std::collections::VecDeque;

/// Default number of notifications kept.
pub const DEFAULT_TRANSCRIPT_CAPACITY: usize = 100;

#[derive(Debug)]
pub struct Transcript {
    entries: VecDeque<DeliveredNotification>,
    capacity: usize,
}

impl Default for Transcript {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_TRANSCRIPT_CAPACITY)
    }
}

impl Transcript {
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append, evicting the oldest entry when full.
    pub fn record(&mut self, delivered: DeliveredNotification) {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(delivered);
    }

    /// Oldest first.
    pub fn entries(&self) -> Vec<DeliveredNotification> {
        self.entries.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
