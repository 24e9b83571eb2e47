//! The client handle: owns the transport and the state shared across calls
//! (clock, clock-skew offset, config). Per-call state lives in
//! [`crate::execution::ExecutionContext`] instead.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::clock::{Clock, ClockSkew, SystemClock};
use crate::config::ClientConfig;
use crate::transport::Transport;

/// No finalizer-driven shutdown (§9, "Scoped client lifetime"): the client
/// owns its transport directly, and dropping it releases transport
/// resources through the transport's own `Drop`.
pub struct Client {
    pub(crate) transport: Arc<dyn Transport>,
    pub(crate) clock: Arc<dyn Clock>,
    pub(crate) clock_skew: ClockSkew,
    pub config: ClientConfig,
    pub(crate) cancellation: CancellationToken,
}

impl Client {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            clock: Arc::new(SystemClock),
            clock_skew: ClockSkew::new(),
            config: ClientConfig::default(),
            cancellation: CancellationToken::new(),
        }
    }

    pub fn with_config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// The clock-skew offset currently in effect. Shared across every call
    /// on this client; reading it never blocks.
    pub fn clock_skew_offset_seconds(&self) -> i64 {
        self.clock_skew.offset_seconds()
    }

    /// Signals cancellation to any call currently suspended in a retry
    /// backoff sleep on this client.
    pub fn cancel(&self) {
        self.cancellation.cancel();
    }
}
