//! Error unmarshaller dispatch (§4.7).

use crate::error::{too_large, ClientError, ServiceError};
use crate::response::{ErrorResponseHandler, HttpResponse};

/// Try the caller's error handler; on failure, apply the bodiless-response
/// fallbacks before giving up.
pub fn unmarshal_error(
    handler: &dyn ErrorResponseHandler,
    response: &HttpResponse,
    service_name: &str,
) -> Result<ServiceError, ClientError> {
    match handler.handle(response) {
        Ok(service_error) => Ok(fill_in(service_error, response, service_name)),
        Err(handler_error) => fallback(response, service_name, handler_error),
    }
}

fn fallback(
    response: &HttpResponse,
    service_name: &str,
    handler_error: ClientError,
) -> Result<ServiceError, ClientError> {
    if response.status_code == 413 {
        return Ok(too_large(service_name));
    }
    if response.status_code == 503 && response.status_text.eq_ignore_ascii_case("service unavailable") {
        return Ok(crate::error::service_unavailable(service_name));
    }
    if handler_error.is_io_error() {
        return Err(handler_error);
    }
    Err(ClientError::with_cause(
        format!(
            "Unable to unmarshall error response (status={})",
            response.status_code
        ),
        handler_error,
    ))
}

fn fill_in(mut error: ServiceError, response: &HttpResponse, service_name: &str) -> ServiceError {
    error.status_code = response.status_code;
    error.service_name = service_name.to_string();
    error
}
