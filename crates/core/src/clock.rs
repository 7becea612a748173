// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Clock abstraction for testable record timestamps
//!
//! Record timestamps are wall-clock nanoseconds since the Unix epoch. They
//! order compaction work but never decide correctness.

use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// A clock that provides the current wall time
pub trait Clock: Clone + Send + Sync + 'static {
    /// Nanoseconds since the Unix epoch
    fn now_nanos(&self) -> i64;
}

/// Real system clock
#[derive(Clone, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_nanos(&self) -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| i64::try_from(d.as_nanos()).unwrap_or(i64::MAX))
            .unwrap_or(0)
    }
}

/// Fake clock for testing with controllable time
#[derive(Clone, Debug)]
pub struct FakeClock {
    current: Arc<Mutex<i64>>,
}

impl FakeClock {
    /// Start at a fixed, arbitrary epoch so tests are reproducible
    pub fn new() -> Self {
        Self::starting_at(1_700_000_000_000_000_000)
    }

    pub fn starting_at(nanos: i64) -> Self {
        Self {
            current: Arc::new(Mutex::new(nanos)),
        }
    }

    /// Advance the clock by the given duration
    pub fn advance(&self, duration: Duration) {
        let step = i64::try_from(duration.as_nanos()).unwrap_or(i64::MAX);
        let mut current = self.current.lock().unwrap_or_else(|e| e.into_inner());
        *current = current.saturating_add(step);
    }

    /// Set the clock to a specific time
    pub fn set(&self, nanos: i64) {
        let mut current = self.current.lock().unwrap_or_else(|e| e.into_inner());
        *current = nanos;
    }
}

impl Default for FakeClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for FakeClock {
    fn now_nanos(&self) -> i64 {
        *self.current.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
#[path = "clock_tests.rs"]
mod tests;
