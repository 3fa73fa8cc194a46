//! # Rewards Engine
//!
//! Command and query facade over the four subsystems. This is the only
//! surface the presentation layer talks to.
//!
//! ## Command Pipeline
//!
//! ```text
//! apply (shared gate) ──→ persist snapshot (exclusive gate) ──→ publish events
//! ```
//!
//! - Mutations run under the shared side of the apply gate, so commands on
//!   different entities proceed in parallel
//! - Snapshot capture takes the exclusive side, so it never observes half a
//!   completion (credit applied, challenge still open)
//! - Events are published only after the snapshot is durable
//! - No-op commands (`Unchanged`) neither persist nor publish, unless an
//!   earlier save failed: then the next command or tick saves again and
//!   publishes the events held back by the failure

mod check_in;
mod outcome;

pub use check_in::{CheckInDecision, CheckInState};
pub use outcome::{CommandOutcome, EngineError, NoOpReason};

use std::sync::Arc;

use chrono::NaiveDate;
use eco_01_ledger::{EntryId, LedgerApi, LedgerEntry};
use eco_02_quest_engine::{
    Challenge, CompletionOutcome, NewChallenge, ProgressOutcome, Progression, QuestEngineApi,
    ToggleOutcome,
};
use eco_03_coupon_registry::{
    Coupon, CouponError, CouponRegistryApi, RandomSource, ThreadRandomSource,
};
use eco_04_notification_scheduler::{
    ChainHandle, DeliveredNotification, NotificationKind, NotificationPayload, SchedulerApi,
};
use eco_telemetry::{
    metric_inc, time_histogram, BALANCE, CHALLENGES_COMPLETED, CHECK_INS, COINS_CREDITED,
    COINS_DEBITED, COMMANDS, COUPONS_ISSUED, COUPONS_REDEEMED, NOTIFICATIONS_CANCELLED,
    NOTIFICATIONS_DELIVERED, PERSIST_DURATION,
};
use parking_lot::{Mutex, RwLock};
use serde::Serialize;
use shared_bus::{
    EventFilter, EventPublisher, EventSubscriber, InMemoryEventBus, RewardEvent, Subscription,
};
use shared_types::{
    calendar_day, ChallengeId, Classify, CouponId, RewardGranted, TimeSource, Timestamp,
};
use tracing::{debug, info, warn};

use crate::adapters::SnapshotStore;
use crate::container::{ConfigError, EngineConfig, SubsystemContainer};

/// First completion of a challenge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionReceipt {
    pub reward: RewardGranted,
    /// `None` if issuance failed. The reward stays in the snapshot until a
    /// later tick, the coupon-unlock step or the next boot issues it.
    pub coupon: Option<Coupon>,
    /// Announcement chain for this reward.
    pub chain: ChainHandle,
}

/// Credited daily check-in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckInReceipt {
    pub day: NaiveDate,
    pub streak: u32,
    pub entry: LedgerEntry,
}

/// Profile numbers shown next to the balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProfileProgress {
    #[serde(flatten)]
    pub progression: Progression,
    /// Consecutive check-in days; zero once a day was missed.
    pub streak: u32,
}

type Applied<T> = (CommandOutcome<T>, Vec<RewardEvent>);

/// What the last successful save does not cover yet.
#[derive(Debug, Default)]
struct Unsaved {
    dirty: bool,
    /// Events of commands applied since, in apply order.
    held: Vec<RewardEvent>,
}

pub struct RewardsEngine {
    container: SubsystemContainer,
    store: Arc<dyn SnapshotStore>,
    bus: Arc<InMemoryEventBus>,
    check_in: Mutex<CheckInState>,
    apply_gate: RwLock<()>,
    /// Serializes capture + save so an older snapshot never overwrites a newer one.
    persist_lock: Mutex<Unsaved>,
    /// Rewards whose coupon issuance failed; persisted and retried.
    deferred_coupons: Mutex<Vec<RewardGranted>>,
    /// Last ledger entry announced on the bus.
    published_through: Mutex<EntryId>,
}

impl RewardsEngine {
    /// Boot from `store`, using thread-local randomness for coupon codes.
    pub fn boot(
        config: EngineConfig,
        store: Arc<dyn SnapshotStore>,
        clock: Arc<dyn TimeSource>,
    ) -> Result<Self, EngineError> {
        Self::boot_with_rng(config, store, clock, Arc::new(ThreadRandomSource))
    }

    pub fn boot_with_rng(
        config: EngineConfig,
        store: Arc<dyn SnapshotStore>,
        clock: Arc<dyn TimeSource>,
        rng: Arc<dyn RandomSource>,
    ) -> Result<Self, EngineError> {
        config.validate()?;
        let snapshot = store.load()?;
        let first_boot = snapshot.is_none();
        let check_in = snapshot.as_ref().map(|s| s.check_in).unwrap_or_default();
        let deferred = snapshot
            .as_ref()
            .map(|s| s.pending_coupons.clone())
            .unwrap_or_default();

        let container = SubsystemContainer::assemble(config, snapshot.as_ref(), clock, rng)?;
        let published_through = container
            .ledger
            .last_entry()
            .map(|e| e.id)
            .unwrap_or(EntryId::GENESIS);
        BALANCE.set(container.ledger.balance() as f64);

        let engine = Self {
            container,
            store,
            bus: Arc::new(InMemoryEventBus::new()),
            check_in: Mutex::new(check_in),
            apply_gate: RwLock::new(()),
            persist_lock: Mutex::new(Unsaved::default()),
            deferred_coupons: Mutex::new(deferred),
            published_through: Mutex::new(published_through),
        };

        let issued = engine.issue_deferred_coupons();
        if first_boot || !issued.is_empty() {
            engine.persist(Vec::new())?;
        }
        if first_boot {
            info!("First boot, initial snapshot written");
        }
        Ok(engine)
    }

    // =========================================================================
    // COMMANDS
    // =========================================================================

    /// Complete a challenge: credit its coins, issue its coupon and schedule
    /// the coin/coupon announcements.
    pub async fn complete_challenge(
        &self,
        id: &ChallengeId,
    ) -> Result<CommandOutcome<CompletionReceipt>, EngineError> {
        let result = self.run(|| self.apply_completion(id)).await;
        record_command("complete_challenge", &result);
        result
    }

    pub async fn toggle_challenge(
        &self,
        id: &ChallengeId,
    ) -> Result<CommandOutcome<Challenge>, EngineError> {
        let result = self.run(|| self.apply_toggle(id)).await;
        record_command("toggle_challenge", &result);
        result
    }

    pub async fn redeem_coupon(
        &self,
        id: &CouponId,
    ) -> Result<CommandOutcome<Coupon>, EngineError> {
        let result = self.run(|| self.apply_redeem(id)).await;
        record_command("redeem_coupon", &result);
        result
    }

    pub async fn enroll_challenge(
        &self,
        challenge: NewChallenge,
    ) -> Result<CommandOutcome<Challenge>, EngineError> {
        let result = self.run(|| self.apply_enroll(challenge)).await;
        record_command("enroll_challenge", &result);
        result
    }

    pub async fn record_progress(
        &self,
        id: &ChallengeId,
        progress: u8,
    ) -> Result<CommandOutcome<Challenge>, EngineError> {
        let result = self.run(|| self.apply_progress(id, progress)).await;
        record_command("record_progress", &result);
        result
    }

    /// Credit the daily check-in once per UTC day.
    pub async fn daily_check_in(&self) -> Result<CommandOutcome<CheckInReceipt>, EngineError> {
        let result = self.run(|| self.apply_check_in()).await;
        record_command("daily_check_in", &result);
        result
    }

    /// Drop the remaining announcements of one reward chain. The ledger and
    /// coupon registry are not touched.
    pub fn cancel_chain(&self, handle: ChainHandle) -> usize {
        let dropped = self.container.scheduler.cancel(handle);
        NOTIFICATIONS_CANCELLED.inc_by(dropped as f64);
        dropped
    }

    /// Drop every pending announcement (session teardown).
    pub fn cancel_notifications(&self) -> usize {
        let dropped = self.container.scheduler.cancel_all();
        NOTIFICATIONS_CANCELLED.inc_by(dropped as f64);
        dropped
    }

    /// Deliver every due notification, retry deferred coupons and catch up
    /// on a failed save.
    pub async fn tick(&self) -> Vec<DeliveredNotification> {
        let delivered = self.container.scheduler.step();
        let unlocked = delivered
            .iter()
            .any(|n| n.kind == NotificationKind::CouponUnlock);
        let issued = self.issue_deferred_coupons();

        // A coupon unlock may have issued a coupon the completion could not.
        if unlocked || !issued.is_empty() || self.has_unsaved_changes() {
            let events = issued
                .iter()
                .map(|coupon| RewardEvent::CouponIssued(coupon.notice()))
                .collect();
            match self.persist(events) {
                Ok(ready) => self.publish_all(ready).await,
                Err(e) => warn!(error = %e, "Snapshot during tick failed"),
            }
        }

        for notification in &delivered {
            metric_inc!(NOTIFICATIONS_DELIVERED, &[notification.kind.as_str()]);
            let payload = serde_json::to_value(&notification.payload).unwrap_or_default();
            self.bus
                .publish(RewardEvent::NotificationDelivered {
                    notification: notification.id.0,
                    kind: notification.kind.as_str().to_string(),
                    chain: notification.chain.map(|c| c.0),
                    delivered_at: notification.delivered_at,
                    payload,
                })
                .await;
        }
        delivered
    }

    // =========================================================================
    // QUERIES
    // =========================================================================

    pub fn balance(&self) -> u64 {
        self.container.ledger.balance()
    }

    pub fn ledger_entries(&self) -> Vec<LedgerEntry> {
        self.container.ledger.entries()
    }

    pub fn challenge(&self, id: &ChallengeId) -> Option<Challenge> {
        self.container.quests.get(id)
    }

    pub fn list_active_challenges(&self) -> Vec<Challenge> {
        self.container.quests.list_active()
    }

    pub fn list_paused_challenges(&self) -> Vec<Challenge> {
        self.container.quests.list_paused()
    }

    pub fn list_completed_challenges(&self) -> Vec<Challenge> {
        self.container.quests.list_completed()
    }

    pub fn list_coupons_for_brand(&self, brand_name: &str) -> Vec<Coupon> {
        self.container.coupons.available_for_brand(brand_name)
    }

    pub fn list_active_coupons(&self) -> Vec<Coupon> {
        self.container.coupons.list_active()
    }

    pub fn list_expired_or_used_coupons(&self) -> Vec<Coupon> {
        self.container.coupons.list_expired_or_used()
    }

    pub fn coupon(&self, id: &CouponId) -> Option<Coupon> {
        self.container.coupons.get(id)
    }

    pub fn find_coupon_by_code(&self, code: &str) -> Option<Coupon> {
        self.container.coupons.find_by_code(code)
    }

    pub fn progression(&self) -> ProfileProgress {
        let today = calendar_day(self.container.clock.now());
        ProfileProgress {
            progression: self.container.quests.progression(),
            streak: self.check_in.lock().current_streak(today),
        }
    }

    pub fn transcript(&self) -> Vec<DeliveredNotification> {
        self.container.scheduler.transcript()
    }

    /// Rewards still waiting for their coupon.
    pub fn deferred_coupons(&self) -> Vec<RewardGranted> {
        self.deferred_coupons.lock().clone()
    }

    /// Whether memory holds changes the last save failed to write.
    pub fn has_unsaved_changes(&self) -> bool {
        self.persist_lock.lock().dirty
    }

    pub fn pending_notifications(&self) -> usize {
        self.container.scheduler.pending()
    }

    pub fn next_notification_due(&self) -> Option<Timestamp> {
        self.container.scheduler.next_due_at()
    }

    /// Re-verify the ledger history.
    pub fn audit(&self) -> Result<(), EngineError> {
        self.container.ledger.audit().map_err(EngineError::from)
    }

    pub fn subscribe(&self, filter: EventFilter) -> Subscription {
        self.bus.subscribe(filter)
    }

    pub fn bus(&self) -> Arc<InMemoryEventBus> {
        Arc::clone(&self.bus)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.container.config
    }

    // =========================================================================
    // PIPELINE
    // =========================================================================

    async fn run<T>(
        &self,
        apply: impl FnOnce() -> Result<Applied<T>, EngineError>,
    ) -> Result<CommandOutcome<T>, EngineError> {
        let (outcome, events) = apply()?;
        let ready = if outcome.is_applied() || self.has_unsaved_changes() {
            self.persist(events)?
        } else {
            events
        };
        self.publish_all(ready).await;
        Ok(outcome)
    }

    async fn publish_all(&self, events: Vec<RewardEvent>) {
        for event in events {
            self.bus.publish(event).await;
        }
    }

    /// Save a snapshot of the current state.
    ///
    /// On success returns the events held back by earlier failures followed
    /// by `events`, ready to publish. On failure `events` are held back too.
    fn persist(&self, events: Vec<RewardEvent>) -> Result<Vec<RewardEvent>, EngineError> {
        let mut unsaved = self.persist_lock.lock();
        let snapshot = {
            let _gate = self.apply_gate.write();
            self.container.capture(
                *self.check_in.lock(),
                self.deferred_coupons.lock().clone(),
            )
        };

        let _timer = time_histogram!(PERSIST_DURATION);
        match self.store.save(&snapshot) {
            Ok(()) => {
                if unsaved.dirty {
                    info!(held = unsaved.held.len(), "Snapshot caught up after failed save");
                }
                unsaved.dirty = false;
                let mut ready = std::mem::take(&mut unsaved.held);
                ready.extend(events);
                Ok(ready)
            }
            Err(e) => {
                warn!(error = %e, "Snapshot write failed, kept for the next save");
                unsaved.dirty = true;
                unsaved.held.extend(events);
                Err(e.into())
            }
        }
    }

    /// Retry reward coupons whose issuance failed. Returns the ones issued now.
    fn issue_deferred_coupons(&self) -> Vec<Coupon> {
        let _gate = self.apply_gate.read();
        let mut deferred = self.deferred_coupons.lock();
        if deferred.is_empty() {
            return Vec::new();
        }

        let mut issued = Vec::new();
        deferred.retain(|reward| match self.container.coupons.issue_for_reward(reward) {
            Ok(coupon) => {
                issued.push(coupon);
                false
            }
            Err(e) => {
                debug!(challenge = %reward.source_challenge, error = %e, "Reward coupon still deferred");
                true
            }
        });
        if !issued.is_empty() {
            info!(issued = issued.len(), left = deferred.len(), "Deferred reward coupons issued");
        }
        issued
    }

    /// Ledger entries appended since the last call, as bus events.
    fn ledger_events(&self) -> Vec<RewardEvent> {
        let mut cursor = self.published_through.lock();
        let fresh = self.container.ledger.entries_since(*cursor);
        if let Some(last) = fresh.last() {
            *cursor = last.id;
            BALANCE.set(last.resulting_balance as f64);
        }
        fresh
            .into_iter()
            .map(|entry| {
                let amount = entry.amount.unsigned_abs();
                if entry.is_credit() {
                    COINS_CREDITED.inc_by(amount as f64);
                    RewardEvent::CoinsCredited {
                        entry: entry.id.0,
                        amount,
                        reason: entry.reason,
                        balance: entry.resulting_balance,
                    }
                } else {
                    COINS_DEBITED.inc_by(amount as f64);
                    RewardEvent::CoinsDebited {
                        entry: entry.id.0,
                        amount,
                        reason: entry.reason,
                        balance: entry.resulting_balance,
                    }
                }
            })
            .collect()
    }

    fn apply_completion(&self, id: &ChallengeId) -> Result<Applied<CompletionReceipt>, EngineError> {
        let _gate = self.apply_gate.read();

        let reward = match self.container.quests.complete(id)? {
            CompletionOutcome::AlreadyCompleted(_) => {
                return Ok(unchanged(NoOpReason::AlreadyCompleted));
            }
            CompletionOutcome::Completed(reward) => reward,
        };
        metric_inc!(CHALLENGES_COMPLETED);

        // The registry is the system of record; the unlock step only
        // announces what is issued here.
        let coupon = match self.container.coupons.issue_for_reward(&reward) {
            Ok(coupon) => {
                metric_inc!(COUPONS_ISSUED);
                Some(coupon)
            }
            Err(e) => {
                warn!(challenge = %id, error = %e, "Reward coupon deferred");
                self.deferred_coupons.lock().push(reward.clone());
                None
            }
        };
        let chain = self.container.scheduler.schedule_reward(&reward);

        let mut events = self.ledger_events();
        events.push(RewardEvent::RewardGranted(reward.clone()));
        if let Some(coupon) = &coupon {
            events.push(RewardEvent::CouponIssued(coupon.notice()));
        }

        Ok((
            CommandOutcome::Applied(CompletionReceipt {
                reward,
                coupon,
                chain,
            }),
            events,
        ))
    }

    fn apply_toggle(&self, id: &ChallengeId) -> Result<Applied<Challenge>, EngineError> {
        let _gate = self.apply_gate.read();
        match self.container.quests.toggle(id)? {
            ToggleOutcome::AlreadyCompleted(_) => Ok(unchanged(NoOpReason::AlreadyCompleted)),
            ToggleOutcome::Toggled(challenge) => {
                let event = RewardEvent::ChallengeToggled {
                    challenge: challenge.id.clone(),
                    active: challenge.is_active(),
                };
                Ok((CommandOutcome::Applied(challenge), vec![event]))
            }
        }
    }

    fn apply_redeem(&self, id: &CouponId) -> Result<Applied<Coupon>, EngineError> {
        let _gate = self.apply_gate.read();
        match self.container.coupons.redeem(id) {
            Ok(coupon) => {
                metric_inc!(COUPONS_REDEEMED);
                let event = RewardEvent::CouponRedeemed {
                    coupon: coupon.id.clone(),
                    code: coupon.code.clone(),
                };
                Ok((CommandOutcome::Applied(coupon), vec![event]))
            }
            Err(CouponError::AlreadyUsed(_)) => Ok(unchanged(NoOpReason::AlreadyUsed)),
            Err(e) => Err(e.into()),
        }
    }

    fn apply_enroll(&self, challenge: NewChallenge) -> Result<Applied<Challenge>, EngineError> {
        let _gate = self.apply_gate.read();
        let enrolled = self.container.quests.enroll(challenge)?;
        let event = RewardEvent::ChallengeEnrolled {
            challenge: enrolled.id.clone(),
        };
        Ok((CommandOutcome::Applied(enrolled), vec![event]))
    }

    fn apply_progress(
        &self,
        id: &ChallengeId,
        progress: u8,
    ) -> Result<Applied<Challenge>, EngineError> {
        let _gate = self.apply_gate.read();
        match self.container.quests.record_progress(id, progress)? {
            ProgressOutcome::AlreadyCompleted(_) => Ok(unchanged(NoOpReason::AlreadyCompleted)),
            ProgressOutcome::Updated(challenge) => {
                Ok((CommandOutcome::Applied(challenge), Vec::new()))
            }
        }
    }

    fn apply_check_in(&self) -> Result<Applied<CheckInReceipt>, EngineError> {
        let _gate = self.apply_gate.read();
        let today = calendar_day(self.container.clock.now());
        let settings = &self.container.config.check_in;

        let mut state = self.check_in.lock();
        let streak = match state.decide(today) {
            CheckInDecision::AlreadyCheckedIn => {
                debug!(day = %today, "Check-in ignored, already credited today");
                return Ok(unchanged(NoOpReason::AlreadyCheckedIn));
            }
            CheckInDecision::Credit { streak } => streak,
        };

        let amount = i64::try_from(settings.coins).map_err(|_| {
            ConfigError::Invalid("check_in.coins exceeds the ledger range".into())
        })?;
        let entry = self.container.ledger.credit(amount, &settings.reason)?;
        state.record(today, streak);
        drop(state);

        metric_inc!(CHECK_INS);
        self.container.scheduler.announce(
            NotificationKind::CoinAward,
            NotificationPayload::Coins {
                amount: settings.coins,
                reason: settings.reason.clone(),
            },
        );
        info!(day = %today, streak, balance = entry.resulting_balance, "Daily check-in credited");

        let mut events = self.ledger_events();
        events.push(RewardEvent::CheckedIn {
            day: today.to_string(),
            streak,
            coins: settings.coins,
        });
        Ok((
            CommandOutcome::Applied(CheckInReceipt { day: today, streak, entry }),
            events,
        ))
    }
}

fn unchanged<T>(reason: NoOpReason) -> Applied<T> {
    (CommandOutcome::Unchanged(reason), Vec::new())
}

fn record_command<T>(command: &str, result: &Result<CommandOutcome<T>, EngineError>) {
    let outcome = match result {
        Ok(outcome) => outcome.label(),
        Err(e) => {
            debug!(command, error = %e, retryable = e.is_retryable(), "Command failed");
            e.label()
        }
    };
    metric_inc!(COMMANDS, &[command, outcome]);
}
