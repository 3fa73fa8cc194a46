//! # Inbound Port - SchedulerApi

use crate::domain::{
    ChainHandle, DeliveredNotification, NotificationId, NotificationKind, NotificationPayload,
};
use shared_types::{RewardGranted, Timestamp};

/// Primary API for the Notification Scheduler.
pub trait SchedulerApi: Send + Sync {
    /// Start the announcement chain for a reward.
    fn schedule_reward(&self, reward: &RewardGranted) -> ChainHandle;

    /// Queue a standalone notification, due immediately.
    fn announce(&self, kind: NotificationKind, payload: NotificationPayload) -> NotificationId;

    /// Deliver everything due now, in due order. Steps that become due as a
    /// result of a delivery in this call are delivered in the same call.
    fn step(&self) -> Vec<DeliveredNotification>;

    /// Cancel the rest of one chain. Returns how many steps were dropped.
    fn cancel(&self, handle: ChainHandle) -> usize;

    fn cancel_all(&self) -> usize;

    fn pending(&self) -> usize;

    fn next_due_at(&self) -> Option<Timestamp>;

    /// Recently delivered notifications, oldest first.
    fn transcript(&self) -> Vec<DeliveredNotification>;
}
