//! Prometheus metrics for the reward subsystems.
//!
//! All metrics follow the naming convention: `eco_<subsystem>_<metric>_<unit>`

use lazy_static::lazy_static;
use prometheus::{
    exponential_buckets, Counter, CounterVec, Encoder, Gauge, Histogram, HistogramOpts, Opts,
    Registry, TextEncoder,
};

use crate::TelemetryError;

lazy_static! {
    /// Global metrics registry
    pub static ref REGISTRY: Registry = Registry::new();

    // =========================================================================
    // LEDGER METRICS (Subsystem 1)
    // =========================================================================

    pub static ref COINS_CREDITED: Counter = Counter::new(
        "eco_ledger_coins_credited_total",
        "Total coins credited to the ledger"
    ).expect("metric creation failed");

    pub static ref COINS_DEBITED: Counter = Counter::new(
        "eco_ledger_coins_debited_total",
        "Total coins debited from the ledger"
    ).expect("metric creation failed");

    pub static ref BALANCE: Gauge = Gauge::new(
        "eco_ledger_balance_coins",
        "Current eco-coin balance"
    ).expect("metric creation failed");

    // =========================================================================
    // QUEST METRICS (Subsystem 2)
    // =========================================================================

    pub static ref CHALLENGES_COMPLETED: Counter = Counter::new(
        "eco_quests_challenges_completed_total",
        "Total first completions of challenges"
    ).expect("metric creation failed");

    pub static ref CHECK_INS: Counter = Counter::new(
        "eco_quests_check_ins_total",
        "Total daily check-ins credited"
    ).expect("metric creation failed");

    // =========================================================================
    // COUPON METRICS (Subsystem 3)
    // =========================================================================

    pub static ref COUPONS_ISSUED: Counter = Counter::new(
        "eco_coupons_issued_total",
        "Total coupons issued"
    ).expect("metric creation failed");

    pub static ref COUPONS_REDEEMED: Counter = Counter::new(
        "eco_coupons_redeemed_total",
        "Total coupons redeemed"
    ).expect("metric creation failed");

    // =========================================================================
    // NOTIFICATION METRICS (Subsystem 4)
    // =========================================================================

    pub static ref NOTIFICATIONS_DELIVERED: CounterVec = CounterVec::new(
        Opts::new("eco_notifications_delivered_total", "Notifications delivered"),
        &["kind"]  // kind: coin-award/coupon-unlock/achievement
    ).expect("metric creation failed");

    pub static ref NOTIFICATIONS_CANCELLED: Counter = Counter::new(
        "eco_notifications_cancelled_total",
        "Scheduled notification steps dropped by cancellation"
    ).expect("metric creation failed");

    // =========================================================================
    // RUNTIME METRICS
    // =========================================================================

    /// Command results by outcome
    pub static ref COMMANDS: CounterVec = CounterVec::new(
        Opts::new("eco_runtime_commands_total", "Commands handled by the engine"),
        &["command", "outcome"]  // outcome: applied/unchanged/rejected/transient
    ).expect("metric creation failed");

    /// Snapshot write duration
    pub static ref PERSIST_DURATION: Histogram = Histogram::with_opts(
        HistogramOpts::new(
            "eco_storage_persist_duration_seconds",
            "Time spent writing the state snapshot"
        ).buckets(exponential_buckets(0.0001, 2.0, 12).unwrap_or_default())
    ).expect("metric creation failed");
}

/// Keeps the registry alive for the process.
pub struct MetricsHandle {
    registry: Registry,
}

impl MetricsHandle {
    /// Encode everything registered so far.
    pub fn encode(&self) -> Result<String, TelemetryError> {
        encode_registry(&self.registry)
    }
}

/// Register all metrics with the global registry.
///
/// Safe to call more than once; already registered collectors are skipped.
pub fn register_metrics() -> Result<MetricsHandle, TelemetryError> {
    let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
        // Ledger
        Box::new(COINS_CREDITED.clone()),
        Box::new(COINS_DEBITED.clone()),
        Box::new(BALANCE.clone()),
        // Quests
        Box::new(CHALLENGES_COMPLETED.clone()),
        Box::new(CHECK_INS.clone()),
        // Coupons
        Box::new(COUPONS_ISSUED.clone()),
        Box::new(COUPONS_REDEEMED.clone()),
        // Notifications
        Box::new(NOTIFICATIONS_DELIVERED.clone()),
        Box::new(NOTIFICATIONS_CANCELLED.clone()),
        // Runtime
        Box::new(COMMANDS.clone()),
        Box::new(PERSIST_DURATION.clone()),
    ];

    for metric in metrics {
        match REGISTRY.register(metric) {
            Ok(()) | Err(prometheus::Error::AlreadyReg) => {}
            Err(e) => return Err(TelemetryError::MetricsInit(e.to_string())),
        }
    }

    Ok(MetricsHandle {
        registry: REGISTRY.clone(),
    })
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> Result<String, TelemetryError> {
    encode_registry(&REGISTRY)
}

fn encode_registry(registry: &Registry) -> Result<String, TelemetryError> {
    let encoder = TextEncoder::new();
    let metric_families = registry.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsInit(e.to_string()))
}

/// Timer guard for automatic histogram observation.
pub struct HistogramTimer {
    histogram: Histogram,
    start: std::time::Instant,
}

impl HistogramTimer {
    /// Start a new timer for the given histogram.
    pub fn new(histogram: &Histogram) -> Self {
        Self {
            histogram: histogram.clone(),
            start: std::time::Instant::now(),
        }
    }
}

impl Drop for HistogramTimer {
    fn drop(&mut self) {
        let duration = self.start.elapsed().as_secs_f64();
        self.histogram.observe(duration);
    }
}

/// Start timing for a histogram. Observation happens on drop.
#[macro_export]
macro_rules! time_histogram {
    ($histogram:expr) => {
        $crate::metrics::HistogramTimer::new(&$histogram)
    };
}
