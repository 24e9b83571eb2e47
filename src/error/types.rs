//! Core error types.

use std::fmt;

/// Broad classification of a [`ServiceError`], mirroring how the remote
/// service itself attributes fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorType {
    /// The caller did something wrong (bad input, expired credentials, ...).
    Client,
    /// The service itself failed (5xx, overload, ...).
    Service,
    /// The service didn't tell us, or we couldn't tell.
    Unknown,
}

impl fmt::Display for ErrorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorType::Client => "client",
            ErrorType::Service => "service",
            ErrorType::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

/// A failure that originated locally or in the transport: nothing reached
/// the service, or the service's response couldn't be trusted.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct ClientError {
    pub message: String,
    #[source]
    pub cause: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl ClientError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            cause: None,
        }
    }

    pub fn with_cause(
        message: impl Into<String>,
        cause: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            message: message.into(),
            cause: Some(Box::new(cause)),
        }
    }

    /// Whether this error's cause is an `std::io::Error` — the signal used
    /// throughout the core to decide whether an unmarshaller failure should
    /// propagate as-is rather than being wrapped.
    pub fn is_io_error(&self) -> bool {
        self.cause
            .as_ref()
            .is_some_and(|c| c.downcast_ref::<std::io::Error>().is_some())
    }
}

/// A failure reported by the remote service itself, after the response was
/// successfully unmarshalled into a typed error.
#[derive(Debug, Clone, thiserror::Error)]
#[error("service error ({status_code}) from {service_name}: {message}")]
pub struct ServiceError {
    pub status_code: u16,
    pub service_name: String,
    pub error_code: String,
    pub error_type: ErrorType,
    pub request_id: Option<String>,
    pub message: String,
}

impl ServiceError {
    pub fn new(
        status_code: u16,
        service_name: impl Into<String>,
        error_code: impl Into<String>,
        error_type: ErrorType,
        message: impl Into<String>,
    ) -> Self {
        Self {
            status_code,
            service_name: service_name.into(),
            error_code: error_code.into(),
            error_type,
            request_id: None,
            message: message.into(),
        }
    }

    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }

    /// Heuristic used by the default retry policy and the clock-skew
    /// detector: true for throttling/overload/5xx-shaped errors.
    pub fn is_throttling_or_server_error(&self) -> bool {
        self.status_code == 429
            || self.status_code == 500
            || self.status_code == 502
            || self.status_code == 503
            || self.status_code == 504
            || self.error_type == ErrorType::Service
    }

    /// True when the error code indicates the caller's clock disagrees with
    /// the server's. Recognized by code, not status code alone (a clock-skew
    /// error is usually surfaced as 403).
    pub fn is_clock_skew(&self) -> bool {
        let lower = self.error_code.to_ascii_lowercase();
        lower.contains("requesttimetooskewed")
            || lower.contains("invalidsignatureexception")
            || lower.contains("signature expired")
            || lower.contains("clock")
    }
}

/// Top-level execution error: exactly the two kinds from the spec.
#[derive(Debug, thiserror::Error)]
pub enum ExecutionError {
    #[error(transparent)]
    Client(#[from] ClientError),
    #[error(transparent)]
    Service(#[from] ServiceError),
}

impl ExecutionError {
    /// Whether the default retry policy should consider this retryable.
    /// Callers with custom `RetryPolicy` impls aren't obligated to use this.
    pub fn is_retryable_by_default(&self) -> bool {
        match self {
            ExecutionError::Client(_) => true,
            ExecutionError::Service(e) => e.is_throttling_or_server_error() || e.is_clock_skew(),
        }
    }

    pub fn as_service_error(&self) -> Option<&ServiceError> {
        match self {
            ExecutionError::Service(e) => Some(e),
            ExecutionError::Client(_) => None,
        }
    }
}
