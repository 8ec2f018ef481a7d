//! # Temporal Types
//!
//! Claim and epoch times are whole seconds since the Unix epoch, UTC. The
//! [`Clock`] trait is how the facade learns "now"; the core never reads the
//! system time directly, which keeps every operation a pure function of
//! its inputs.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;

/// Seconds since 1970-01-01T00:00:00Z.
pub type UnixSeconds = u64;

/// Source of the current time.
pub trait Clock: Send + Sync {
    /// Current time in Unix seconds.
    fn now_s(&self) -> UnixSeconds;
}

/// Wall-clock time via `chrono::Utc`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_s(&self) -> UnixSeconds {
        // Pre-1970 clocks clamp to zero.
        u64::try_from(Utc::now().timestamp()).unwrap_or(0)
    }
}

/// A settable clock for tests and replay tooling.
#[derive(Debug, Default)]
pub struct ManualClock(AtomicU64);

impl ManualClock {
    /// Start at `now_s`.
    pub fn new(now_s: UnixSeconds) -> Self {
        Self(AtomicU64::new(now_s))
    }

    /// Jump to `now_s`.
    pub fn set(&self, now_s: UnixSeconds) {
        self.0.store(now_s, Ordering::SeqCst);
    }

    /// Move forward by `secs`.
    pub fn advance(&self, secs: u64) {
        self.0.fetch_add(secs, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_s(&self) -> UnixSeconds {
        self.0.load(Ordering::SeqCst)
    }
}
