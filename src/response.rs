//! Response data model (§3) and the caller-supplied unmarshalling contracts
//! it flows through (§6).

use std::collections::HashMap;

use crate::error::ClientError;

/// Raw transport result. Owned by the core until handed to a
/// [`ResponseHandler`]/[`ErrorResponseHandler`] or closed.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status_code: u16,
    pub status_text: String,
    pub headers: HashMap<String, String>,
    pub body: Option<bytes::Bytes>,
}

impl HttpResponse {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }

    /// Releases the content stream: drops the buffered body so nothing
    /// downstream, including a returned `Response<T>`, can read stale bytes
    /// once the core has decided this response is closed. The execution loop
    /// calls this on every loop exit unless the handler asked to leave the
    /// connection open (§5 "Resource lifecycle").
    pub fn close(&mut self) {
        if self.body.take().is_some() {
            tracing::trace!(status = self.status_code, "response content stream closed");
        }
    }
}

/// Unmarshalled payload plus the raw response it was built from, returned to
/// the caller on success.
#[derive(Debug)]
pub struct Response<T> {
    pub body: T,
    pub http_response: HttpResponse,
}

/// Caller-supplied success unmarshaller.
pub trait ResponseHandler<T>: Send + Sync {
    fn handle(&self, response: &HttpResponse) -> Result<T, ClientError>;

    /// If true, the execution loop does not close the response's content
    /// stream on return — the handler (or its caller) owns that lifecycle.
    fn needs_connection_left_open(&self) -> bool {
        false
    }
}


/// Caller-supplied error unmarshaller.
pub trait ErrorResponseHandler: Send + Sync {
    fn handle(&self, response: &HttpResponse) -> Result<crate::error::ServiceError, ClientError>;

    fn needs_connection_left_open(&self) -> bool {
        false
    }
}
