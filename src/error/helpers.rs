//! Ergonomic constructors for the error types in [`super::types`].

use super::types::{ClientError, ErrorType, ServiceError};

pub fn client_error(message: impl Into<String>) -> ClientError {
    ClientError::new(message)
}

pub fn client_error_with_cause(
    message: impl Into<String>,
    cause: impl std::error::Error + Send + Sync + 'static,
) -> ClientError {
    ClientError::with_cause(message, cause)
}

/// Synthetic error for a bodiless 413, per the error unmarshaller dispatch
/// fallback.
pub fn too_large(service_name: impl Into<String>) -> ServiceError {
    ServiceError::new(
        413,
        service_name,
        "Request entity too large",
        ErrorType::Client,
        "Request entity too large",
    )
}

/// Synthetic error for a bodiless 503 "Service Unavailable", per the error
/// unmarshaller dispatch fallback.
pub fn service_unavailable(service_name: impl Into<String>) -> ServiceError {
    ServiceError::new(
        503,
        service_name,
        "Service unavailable",
        ErrorType::Service,
        "Service unavailable",
    )
}
