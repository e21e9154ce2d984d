//! Runtime facts supplied per request: process uptime and network latency.
//!
//! The process start instant is recorded once. Hosts call [`mark_started`]
//! early in `main`; otherwise the first uptime query becomes the start.

use std::sync::OnceLock;
use std::time::{Duration, Instant};

static STARTED: OnceLock<Instant> = OnceLock::new();

/// Record the process start instant (no-op after the first call).
pub fn mark_started() -> Instant {
    *STARTED.get_or_init(Instant::now)
}

/// Time elapsed since [`mark_started`].
pub fn uptime() -> Duration {
    mark_started().elapsed()
}

/// Uptime and latency captured for one reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuntimeSnapshot {
    /// Whole seconds since the process started.
    pub uptime_seconds: u64,
    /// Round-trip latency to the platform; negative when not yet measured.
    pub latency_millis: i64,
}

impl RuntimeSnapshot {
    pub fn new(uptime: Duration, latency_millis: i64) -> Self {
        Self {
            uptime_seconds: uptime.as_secs(),
            latency_millis,
        }
    }

    /// Snapshot of this process's uptime with the host-reported latency.
    pub fn capture(latency_millis: i64) -> Self {
        Self::new(uptime(), latency_millis)
    }

    /// Snapshot from a host that reports uptime as fractional seconds.
    ///
    /// # Panics
    ///
    /// If `uptime_secs` is negative, not finite, or out of range. That is a
    /// host bug, not a condition to recover from.
    pub fn from_secs_f64(uptime_secs: f64, latency_millis: i64) -> Self {
        let uptime = Duration::try_from_secs_f64(uptime_secs)
            .unwrap_or_else(|_| panic!("host reported invalid uptime: {uptime_secs}"));
        Self::new(uptime, latency_millis)
    }

    /// Whether the host has measured latency yet.
    pub fn latency_measured(&self) -> bool {
        self.latency_millis >= 0
    }
}
