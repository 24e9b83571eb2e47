//! Static client configuration (§2.1, §3 `ClientConfig`).

use std::sync::Arc;

use crate::retry::{DefaultRetryPolicy, RetryPolicy};

pub const DEFAULT_USER_AGENT: &str = concat!("exec-core/", env!("CARGO_PKG_VERSION"));

/// Shared, immutable client knobs. Built with the teacher's `with_*`
/// builder idiom rather than a derive-heavy config struct.
#[derive(Clone)]
pub struct ClientConfig {
    pub user_agent: String,
    /// `None` means unset; negative values aren't representable by
    /// construction (unlike the source system's sentinel-negative `int`).
    pub max_error_retry: Option<u32>,
    pub retry_policy: Arc<dyn RetryPolicy>,
    pub proxy: Option<String>,
    pub connect_timeout: std::time::Duration,
    pub request_timeout: std::time::Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            max_error_retry: None,
            retry_policy: Arc::new(DefaultRetryPolicy::new()),
            proxy: None,
            connect_timeout: std::time::Duration::from_secs(10),
            request_timeout: std::time::Duration::from_secs(30),
        }
    }
}

impl ClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_max_error_retry(mut self, max_error_retry: u32) -> Self {
        self.max_error_retry = Some(max_error_retry);
        self
    }

    pub fn with_retry_policy(mut self, retry_policy: Arc<dyn RetryPolicy>) -> Self {
        self.retry_policy = retry_policy;
        self
    }

    pub fn with_proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }

    pub fn with_connect_timeout(mut self, timeout: std::time::Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn with_request_timeout(mut self, timeout: std::time::Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// User-agent appender, idempotent across repeated calls: if `value` is
    /// already present as a token, it is not duplicated.
    pub fn append_user_agent(base: &str, value: &str) -> String {
        if value.is_empty() || base.split(' ').any(|tok| tok == value) {
            return base.to_string();
        }
        format!("{base} {value}")
    }
}
