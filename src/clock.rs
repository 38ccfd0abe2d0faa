//! Monotonic clock sources
//!
//! The ledger stamps records with whatever the injected clock returns.
//! Implementations must never go backwards.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;

/// Source of the current ledger time
pub trait Clock: Send + Sync {
    fn now(&self) -> u64;
}

/// Manually driven clock for tests and replay
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicU64,
}

impl ManualClock {
    pub fn new(start: u64) -> Self {
        Self {
            now: AtomicU64::new(start),
        }
    }

    /// Moves the clock forward by `ticks`
    pub fn advance(&self, ticks: u64) {
        self.now.fetch_add(ticks, Ordering::SeqCst);
    }

    /// Sets the clock to `value`, ignoring values in the past
    pub fn set(&self, value: u64) {
        self.now.fetch_max(value, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> u64 {
        self.now.load(Ordering::SeqCst)
    }
}

/// Wall clock in unix seconds, clamped to be non-decreasing
#[derive(Debug, Default)]
pub struct SystemClock {
    high_water: AtomicU64,
}

impl SystemClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clock that never reports less than `floor`, e.g. the newest
    /// timestamp of a restored ledger
    pub fn resume(floor: u64) -> Self {
        Self {
            high_water: AtomicU64::new(floor),
        }
    }
}

impl Clock for SystemClock {
    fn now(&self) -> u64 {
        let wall = u64::try_from(Utc::now().timestamp()).unwrap_or(0);
        let previous = self.high_water.fetch_max(wall, Ordering::SeqCst);
        previous.max(wall)
    }
}
