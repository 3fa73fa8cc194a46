//! # Notification Queue
//!
//! Due-time ordered queue of steps plus the not-yet-scheduled tails of live
//! chains. A chain has at most one step in the queue at any time; its next
//! step is only queued when the current one is delivered, which makes FIFO
//! per chain hold regardless of delays.

use super::entities::{
    ChainHandle, ChainStep, NotificationId, NotificationKind, NotificationPayload, ScheduledStep,
    StepAction,
};
use shared_types::Timestamp;
use std::collections::{BTreeMap, HashMap, VecDeque};

#[derive(Debug, Default)]
pub struct NotificationQueue {
    /// Keyed by (due_at, id); ties break by enqueue order.
    queue: BTreeMap<(Timestamp, NotificationId), ScheduledStep>,
    /// Remaining steps of each live chain.
    chains: HashMap<ChainHandle, VecDeque<ChainStep>>,
    next_id: u64,
    next_chain: u64,
}

impl NotificationQueue {
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate_id(&mut self) -> NotificationId {
        self.next_id += 1;
        NotificationId(self.next_id)
    }

    fn push(
        &mut self,
        kind: NotificationKind,
        action: StepAction,
        chain: Option<ChainHandle>,
        now: Timestamp,
        delay_ms: u64,
    ) -> NotificationId {
        let id = self.allocate_id();
        let due_at = now.saturating_add(delay_ms);
        self.queue.insert(
            (due_at, id),
            ScheduledStep {
                id,
                kind,
                action,
                chain,
                enqueued_at: now,
                due_at,
            },
        );
        id
    }

    /// Start a chain; its first step is queued relative to `now`.
    ///
    /// An empty step list yields a handle with nothing to deliver.
    pub fn start_chain(&mut self, steps: Vec<ChainStep>, now: Timestamp) -> ChainHandle {
        self.next_chain += 1;
        let handle = ChainHandle(self.next_chain);
        let mut steps: VecDeque<ChainStep> = steps.into();
        if let Some(first) = steps.pop_front() {
            self.push(first.kind, first.action, Some(handle), now, first.delay_ms);
            self.chains.insert(handle, steps);
        }
        handle
    }

    /// Queue a standalone, immediately due notification.
    pub fn announce(
        &mut self,
        kind: NotificationKind,
        payload: NotificationPayload,
        now: Timestamp,
    ) -> NotificationId {
        self.push(kind, StepAction::Announce(payload), None, now, 0)
    }

    /// Remove the earliest step due at or before `now`.
    pub fn pop_due(&mut self, now: Timestamp) -> Option<ScheduledStep> {
        let key = *self.queue.keys().next()?;
        if key.0 > now {
            return None;
        }
        self.queue.remove(&key)
    }

    /// Queue the chain's next step after a delivery. Drops the chain once its
    /// last step has been delivered.
    pub fn advance_chain(&mut self, handle: ChainHandle, delivered_at: Timestamp) {
        let Some(rest) = self.chains.get_mut(&handle) else {
            return;
        };
        match rest.pop_front() {
            // An emptied tail stays in the map until its last step is
            // delivered, so `cancel` still finds the chain.
            Some(next) => {
                self.push(next.kind, next.action, Some(handle), delivered_at, next.delay_ms);
            }
            None => {
                self.chains.remove(&handle);
            }
        }
    }

    /// Cancel every remaining step of a chain. Returns how many queued or
    /// pending steps were dropped.
    pub fn cancel(&mut self, handle: ChainHandle) -> usize {
        let pending = self.chains.remove(&handle).map_or(0, |rest| rest.len());
        let before = self.queue.len();
        self.queue.retain(|_, step| step.chain != Some(handle));
        pending + (before - self.queue.len())
    }

    /// Drop everything. Returns how many steps were dropped.
    pub fn cancel_all(&mut self) -> usize {
        let pending: usize = self.chains.values().map(VecDeque::len).sum();
        let queued = self.queue.len();
        self.chains.clear();
        self.queue.clear();
        pending + queued
    }

    pub fn is_live(&self, handle: ChainHandle) -> bool {
        self.chains.contains_key(&handle)
    }

    /// Steps queued or waiting in a chain.
    pub fn pending(&self) -> usize {
        self.queue.len() + self.chains.values().map(VecDeque::len).sum::<usize>()
    }

    pub fn next_due_at(&self) -> Option<Timestamp> {
        self.queue.keys().next().map(|(due, _)| *due)
    }
}
