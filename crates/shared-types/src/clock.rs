//! # Time Source
//!
//! Abstracted clock so every subsystem can be driven with deterministic time.

use crate::entities::{Timestamp, DAY_MS};
use chrono::{DateTime, NaiveDate};
use std::sync::atomic::{AtomicU64, Ordering};

/// Time source for consistent timestamp handling.
pub trait TimeSource: Send + Sync {
    /// Returns the current timestamp in milliseconds.
    fn now(&self) -> Timestamp;
}

/// Default system time source.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now(&self) -> Timestamp {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as Timestamp
    }
}

/// Manually advanced clock for tests and simulations.
#[derive(Debug, Default)]
pub struct MockTimeSource {
    time: AtomicU64,
}

impl MockTimeSource {
    pub fn new(initial: Timestamp) -> Self {
        Self {
            time: AtomicU64::new(initial),
        }
    }

    pub fn advance(&self, ms: u64) {
        self.time.fetch_add(ms, Ordering::SeqCst);
    }

    pub fn advance_days(&self, days: u64) {
        self.advance(days * DAY_MS);
    }

    pub fn set(&self, time: Timestamp) {
        self.time.store(time, Ordering::SeqCst);
    }
}

impl TimeSource for MockTimeSource {
    fn now(&self) -> Timestamp {
        self.time.load(Ordering::SeqCst)
    }
}

/// UTC calendar day containing `ts`.
pub fn calendar_day(ts: Timestamp) -> NaiveDate {
    DateTime::from_timestamp_millis(ts as i64)
        .map(|dt| dt.date_naive())
        .unwrap_or_default()
}

/// Add a signed millisecond offset to a timestamp, clamping at the epoch.
pub fn offset_timestamp(ts: Timestamp, offset_ms: i64) -> Timestamp {
    if offset_ms >= 0 {
        ts.saturating_add(offset_ms as u64)
    } else {
        ts.saturating_sub(offset_ms.unsigned_abs())
    }
}
