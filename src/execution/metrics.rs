//! Timing taps around the execution loop. Not a metrics façade of its own —
//! just `tracing` spans/events plus an in-memory summary callers can inspect
//! in tests, grounded in the teacher's use of `tracing` around its executors.

use std::time::{Duration, Instant};

#[derive(Debug, Default, Clone)]
pub struct ExecutionMetrics {
    pub attempts: u32,
    pub total_duration: Duration,
    pub sign_duration: Duration,
    pub transport_duration: Duration,
    pub backoff_duration: Duration,
}

/// Scoped timer: `start()` at entry, `elapsed()` or `record_into` at exit.
pub struct Timer(Instant);

impl Timer {
    pub fn start() -> Self {
        Self(Instant::now())
    }

    pub fn elapsed(&self) -> Duration {
        self.0.elapsed()
    }
}

impl Default for Timer {
    fn default() -> Self {
        Self::start()
    }
}
