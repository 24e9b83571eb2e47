//! Clock capability and clock-skew tracking.
//!
//! The source system keeps the skew offset in a process-wide global. This
//! crate instead threads an explicit [`Clock`] capability through signing for
//! testability, while keeping the offset itself as a client-owned atomic so
//! concurrent `execute` calls on the same client observe each other's
//! corrections (see SPEC_FULL.md §3.1).

use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, Utc};

/// Capability for reading the current time, so signing and clock-skew
/// correction are deterministic in tests.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// The real wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A fixed clock for tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Shared, signed clock-skew offset (seconds), applied on top of [`Clock::now`]
/// when signing. Never reset once set; starts at zero.
#[derive(Clone, Default)]
pub struct ClockSkew {
    offset_seconds: Arc<AtomicI64>,
}

impl ClockSkew {
    pub fn new() -> Self {
        Self {
            offset_seconds: Arc::new(AtomicI64::new(0)),
        }
    }

    pub fn offset_seconds(&self) -> i64 {
        self.offset_seconds.load(Ordering::SeqCst)
    }

    pub fn set_offset_seconds(&self, offset: i64) {
        self.offset_seconds.store(offset, Ordering::SeqCst);
    }

    /// "Now," corrected for the currently known skew.
    pub fn corrected_now(&self, clock: &dyn Clock) -> DateTime<Utc> {
        clock.now() + chrono::Duration::seconds(self.offset_seconds())
    }
}

impl std::fmt::Debug for ClockSkew {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClockSkew")
            .field("offset_seconds", &self.offset_seconds())
            .finish()
    }
}

/// Adapts a base `Clock` plus a shared `ClockSkew` into a single `Clock`, so
/// a signer only ever needs one capability to get skew-corrected time.
pub struct SkewedClock<'a> {
    pub clock: &'a dyn Clock,
    pub skew: &'a ClockSkew,
}

impl Clock for SkewedClock<'_> {
    fn now(&self) -> DateTime<Utc> {
        self.skew.corrected_now(self.clock)
    }
}

/// Recover the server's clock from a response and compute (then store) the
/// new skew offset, per §4.8. Any parsing failure yields offset 0 (logged,
/// not raised) rather than touching the stored offset with garbage — but the
/// spec calls for *storing* offset 0 on failure, so we do exactly that.
pub fn correct_clock_skew(
    skew: &ClockSkew,
    clock: &dyn Clock,
    date_header: Option<&str>,
    error_message_body: &str,
) {
    let device_now = clock.now();
    let server_time = date_header
        .and_then(parse_rfc822)
        .or_else(|| extract_server_time_from_message(error_message_body));

    let offset = match server_time {
        Some(server_time) => {
            let device_ms = device_now.timestamp_millis();
            let server_ms = server_time.timestamp_millis();
            (device_ms - server_ms) / 1000
        }
        None => {
            tracing::warn!("clock skew correction: could not determine server time, using offset 0");
            0
        }
    };

    tracing::debug!(offset, "clock skew corrected");
    skew.set_offset_seconds(offset);
}

fn parse_rfc822(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc2822(s)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Extract the server's timestamp from an error message body using the
/// convention: the first parenthesized group before either `" + 15"` or
/// `" - 15"`, parsed as compact ISO 8601 (`YYYYMMDDTHHMMSSZ`).
///
/// On any failure to locate both delimiters, returns `None` rather than
/// underflowing a substring index (see SPEC_FULL.md §9, "server-time
/// extractor safety").
fn extract_server_time_from_message(message: &str) -> Option<DateTime<Utc>> {
    let marker_pos = message
        .find(" + 15")
        .or_else(|| message.find(" - 15"))?;
    let open_paren = message[..marker_pos].rfind('(')?;
    let candidate = &message[open_paren + 1..marker_pos];
    parse_compact_iso8601(candidate.trim())
}

fn parse_compact_iso8601(s: &str) -> Option<DateTime<Utc>> {
    let naive = chrono::NaiveDateTime::parse_from_str(s, "%Y%m%dT%H%M%SZ").ok()?;
    Some(DateTime::from_naive_utc_and_offset(naive, Utc))
}
