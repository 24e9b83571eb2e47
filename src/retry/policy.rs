//! Retry policy (§4.2, §4.2.1).

use std::time::Duration;

use rand::Rng;

use crate::error::ExecutionError;

/// Pure, shared decision object. Implementations must be cheap to call and
/// side-effect free; the execution loop may call `should_retry`/`delay`
/// multiple times per attempt (e.g. while reconciling against client
/// config).
pub trait RetryPolicy: Send + Sync {
    fn max_error_retry(&self) -> u32;

    fn honors_client_config_max_retries(&self) -> bool;

    fn should_retry(&self, error: &ExecutionError, retries_so_far: u32) -> bool;

    fn delay(&self, error: &ExecutionError, retries_so_far: u32) -> Duration;
}

/// Reconciles the policy's own ceiling against an optional client-config
/// override, per §4.2's "effective ceiling rule".
pub fn effective_max_retries(policy: &dyn RetryPolicy, config_max_error_retry: Option<u32>) -> u32 {
    match config_max_error_retry {
        Some(cfg_max) if policy.honors_client_config_max_retries() => cfg_max,
        _ => policy.max_error_retry(),
    }
}

/// Exponential backoff with optional jitter, grounded in the teacher's
/// `retry::RetryPolicy`/`add_jitter`.
pub struct DefaultRetryPolicy {
    pub max_error_retry: u32,
    pub honors_client_config_max_retries: bool,
    pub base_delay: Duration,
    pub max_delay: Duration,
    pub multiplier: f64,
    pub use_jitter: bool,
    pub jitter_factor: f64,
    pub retry_condition: Option<Box<dyn Fn(&ExecutionError) -> bool + Send + Sync>>,
}

impl Default for DefaultRetryPolicy {
    fn default() -> Self {
        Self {
            max_error_retry: 3,
            honors_client_config_max_retries: true,
            base_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(20),
            multiplier: 2.0,
            use_jitter: true,
            jitter_factor: 0.2,
            retry_condition: None,
        }
    }
}

impl DefaultRetryPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_error_retry(mut self, max_error_retry: u32) -> Self {
        self.max_error_retry = max_error_retry;
        self
    }

    pub fn with_honors_client_config_max_retries(mut self, honors: bool) -> Self {
        self.honors_client_config_max_retries = honors;
        self
    }

    pub fn with_backoff(mut self, base_delay: Duration, max_delay: Duration, multiplier: f64) -> Self {
        self.base_delay = base_delay;
        self.max_delay = max_delay;
        self.multiplier = multiplier;
        self
    }

    pub fn with_jitter(mut self, use_jitter: bool, jitter_factor: f64) -> Self {
        self.use_jitter = use_jitter;
        self.jitter_factor = jitter_factor;
        self
    }

    pub fn with_retry_condition(
        mut self,
        condition: impl Fn(&ExecutionError) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.retry_condition = Some(Box::new(condition));
        self
    }

    fn add_jitter(&self, delay: Duration) -> Duration {
        if !self.use_jitter {
            return delay;
        }
        let millis = delay.as_millis() as f64;
        let spread = millis * self.jitter_factor;
        let jittered = rand::thread_rng().gen_range(-spread..=spread);
        let result = (millis + jittered).max(0.0);
        Duration::from_millis(result as u64)
    }
}

impl RetryPolicy for DefaultRetryPolicy {
    fn max_error_retry(&self) -> u32 {
        self.max_error_retry
    }

    fn honors_client_config_max_retries(&self) -> bool {
        self.honors_client_config_max_retries
    }

    fn should_retry(&self, error: &ExecutionError, _retries_so_far: u32) -> bool {
        match &self.retry_condition {
            Some(condition) => condition(error),
            None => error.is_retryable_by_default(),
        }
    }

    fn delay(&self, _error: &ExecutionError, retries_so_far: u32) -> Duration {
        let scaled = self.base_delay.as_millis() as f64 * self.multiplier.powi(retries_so_far as i32);
        let capped = Duration::from_millis(scaled.min(self.max_delay.as_millis() as f64) as u64);
        self.add_jitter(capped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ClientError, ErrorType, ServiceError};

    fn service_error(status: u16) -> ExecutionError {
        ExecutionError::Service(ServiceError::new(status, "svc", "Err", ErrorType::Service, "boom"))
    }

    #[test]
    fn should_retry_defaults_to_5xx_and_throttling() {
        let policy = DefaultRetryPolicy::new();
        assert!(policy.should_retry(&service_error(500), 0));
        assert!(policy.should_retry(&service_error(429), 0));
        assert!(!policy.should_retry(
            &ExecutionError::Service(ServiceError::new(400, "svc", "BadRequest", ErrorType::Client, "x")),
            0
        ));
    }

    #[test]
    fn client_errors_are_retryable_by_default() {
        let policy = DefaultRetryPolicy::new();
        let err = ExecutionError::Client(ClientError::new("io failure"));
        assert!(policy.should_retry(&err, 0));
    }

    #[test]
    fn delay_grows_exponentially_without_jitter() {
        let policy = DefaultRetryPolicy::new().with_jitter(false, 0.0);
        let err = service_error(500);
        assert_eq!(policy.delay(&err, 0), Duration::from_millis(100));
        assert_eq!(policy.delay(&err, 1), Duration::from_millis(200));
        assert_eq!(policy.delay(&err, 2), Duration::from_millis(400));
    }

    #[test]
    fn delay_is_capped_at_max_delay() {
        let policy = DefaultRetryPolicy::new()
            .with_backoff(Duration::from_millis(100), Duration::from_millis(300), 2.0)
            .with_jitter(false, 0.0);
        assert_eq!(policy.delay(&service_error(500), 10), Duration::from_millis(300));
    }

    #[test]
    fn custom_retry_condition_overrides_default() {
        let policy = DefaultRetryPolicy::new().with_retry_condition(|_| false);
        assert!(!policy.should_retry(&service_error(500), 0));
    }

    #[test]
    fn effective_ceiling_prefers_config_when_honored() {
        let policy = DefaultRetryPolicy::new().with_max_error_retry(3);
        assert_eq!(effective_max_retries(&policy, Some(7)), 7);
        assert_eq!(effective_max_retries(&policy, None), 3);
    }

    #[test]
    fn effective_ceiling_ignores_config_when_not_honored() {
        let policy = DefaultRetryPolicy::new()
            .with_max_error_retry(3)
            .with_honors_client_config_max_retries(false);
        assert_eq!(effective_max_retries(&policy, Some(7)), 3);
    }
}
