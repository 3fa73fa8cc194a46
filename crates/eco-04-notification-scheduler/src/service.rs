//! # Scheduler Service
//!
//! The queue and transcript sit behind one mutex. Coupon issuance runs with
//! the mutex released so a slow registry never blocks enqueues.

use crate::domain::{
    ChainHandle, ChainTiming, DeliveredNotification, NotificationId, NotificationKind,
    NotificationPayload, NotificationQueue, ScheduledStep, StepAction, Transcript,
};
use crate::ports::{CouponIssuer, SchedulerApi};
use parking_lot::Mutex;
use shared_types::{RewardGranted, TimeSource, Timestamp};
use std::sync::Arc;
use tracing::{debug, info, warn};

struct State {
    queue: NotificationQueue,
    transcript: Transcript,
}

pub struct NotificationSchedulerService {
    state: Mutex<State>,
    timing: ChainTiming,
    issuer: Arc<dyn CouponIssuer>,
    clock: Arc<dyn TimeSource>,
}

impl NotificationSchedulerService {
    pub fn new(
        timing: ChainTiming,
        transcript_capacity: usize,
        issuer: Arc<dyn CouponIssuer>,
        clock: Arc<dyn TimeSource>,
    ) -> Self {
        Self {
            state: Mutex::new(State {
                queue: NotificationQueue::new(),
                transcript: Transcript::with_capacity(transcript_capacity),
            }),
            timing,
            issuer,
            clock,
        }
    }

    pub fn timing(&self) -> ChainTiming {
        self.timing
    }

    fn resolve(&self, step: &ScheduledStep) -> Option<NotificationPayload> {
        match &step.action {
            StepAction::Announce(payload) => Some(payload.clone()),
            StepAction::UnlockCoupon(reward) => match self.issuer.issue_for_reward(reward) {
                Ok(notice) => Some(NotificationPayload::Coupon(notice)),
                Err(e) => {
                    // The registry stays authoritative; only the announcement
                    // is lost.
                    warn!(
                        challenge = %reward.source_challenge,
                        error = %e,
                        "[eco-04] Coupon unlock skipped"
                    );
                    None
                }
            },
        }
    }

    fn pop_due(&self, now: Timestamp) -> Option<ScheduledStep> {
        self.state.lock().queue.pop_due(now)
    }
}

impl SchedulerApi for NotificationSchedulerService {
    fn schedule_reward(&self, reward: &RewardGranted) -> ChainHandle {
        let steps = self.timing.reward_steps(reward);
        let now = self.clock.now();
        let handle = self.state.lock().queue.start_chain(steps, now);
        debug!(
            chain = %handle,
            challenge = %reward.source_challenge,
            "[eco-04] Reward chain scheduled"
        );
        handle
    }

    fn announce(&self, kind: NotificationKind, payload: NotificationPayload) -> NotificationId {
        let now = self.clock.now();
        self.state.lock().queue.announce(kind, payload, now)
    }

    fn step(&self) -> Vec<DeliveredNotification> {
        let mut delivered = Vec::new();

        while let Some(step) = self.pop_due(self.clock.now()) {
            let payload = self.resolve(&step);
            let delivered_at = self.clock.now();

            let mut state = self.state.lock();
            if let Some(chain) = step.chain {
                // Cancelled while the issuer ran: drop the announcement too.
                if !state.queue.is_live(chain) {
                    continue;
                }
                state.queue.advance_chain(chain, delivered_at);
            }
            let Some(payload) = payload else {
                continue;
            };

            let notification = DeliveredNotification {
                id: step.id,
                kind: step.kind,
                payload,
                enqueued_at: step.enqueued_at,
                delivered_at,
                chain: step.chain,
            };
            state.transcript.record(notification.clone());
            drop(state);

            info!(
                id = %notification.id,
                kind = ?notification.kind,
                latency_ms = delivered_at.saturating_sub(step.due_at),
                "[eco-04] Notification delivered"
            );
            delivered.push(notification);
        }

        delivered
    }

    fn cancel(&self, handle: ChainHandle) -> usize {
        let dropped = self.state.lock().queue.cancel(handle);
        if dropped > 0 {
            info!(chain = %handle, dropped, "[eco-04] Chain cancelled");
        }
        dropped
    }

    fn cancel_all(&self) -> usize {
        let dropped = self.state.lock().queue.cancel_all();
        info!(dropped, "[eco-04] All notifications cancelled");
        dropped
    }

    fn pending(&self) -> usize {
        self.state.lock().queue.pending()
    }

    fn next_due_at(&self) -> Option<Timestamp> {
        self.state.lock().queue.next_due_at()
    }

    fn transcript(&self) -> Vec<DeliveredNotification> {
        self.state.lock().transcript.entries()
    }
}
