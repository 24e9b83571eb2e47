//! Request data model (§3).

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::ClientError;

/// A possibly-rewindable payload stream.
///
/// `Body` is deliberately minimal: the core only needs to know whether a
/// body can be rewound, and to be able to mark/reset it between attempts. The
/// actual bytes are opaque to the core past `as_bytes`.
pub trait Body: Send + Sync + std::fmt::Debug {
    /// Whether this body supports mark/reset.
    fn is_rewindable(&self) -> bool;

    /// Record the current position as the rewind mark. Called once, before
    /// the first attempt.
    fn mark(&mut self) {}

    /// Reset to the previously recorded mark. Only ever called when
    /// `is_rewindable()` is true.
    fn reset(&mut self) -> std::io::Result<()>;

    /// The bytes to send for the current attempt.
    fn as_bytes(&self) -> &[u8];
}

/// An in-memory body. Always rewindable: resetting is just re-exposing the
/// same buffer.
#[derive(Debug, Clone)]
pub struct BytesBody {
    data: bytes::Bytes,
}

impl BytesBody {
    pub fn new(data: impl Into<bytes::Bytes>) -> Self {
        Self { data: data.into() }
    }
}

impl Body for BytesBody {
    fn is_rewindable(&self) -> bool {
        true
    }

    fn reset(&mut self) -> std::io::Result<()> {
        Ok(())
    }

    fn as_bytes(&self) -> &[u8] {
        &self.data
    }
}

/// A body that can only be consumed once — e.g. backed by a one-shot reader
/// or pipe. Retrying a request carrying one of these raises a `ClientError`
/// rather than silently resending stale/partial data.
#[derive(Debug)]
pub struct NonRewindableBody {
    data: bytes::Bytes,
    consumed: bool,
}

impl NonRewindableBody {
    pub fn new(data: impl Into<bytes::Bytes>) -> Self {
        Self {
            data: data.into(),
            consumed: false,
        }
    }
}

impl Body for NonRewindableBody {
    fn is_rewindable(&self) -> bool {
        false
    }

    fn mark(&mut self) {
        self.consumed = true;
    }

    fn reset(&mut self) -> std::io::Result<()> {
        Err(std::io::Error::other("body is not rewindable"))
    }

    fn as_bytes(&self) -> &[u8] {
        &self.data
    }
}

/// Immutable, user-level request. Opaque to the core except for the couple
/// of client-option markers it defines (e.g. a user-agent addition).
#[derive(Debug, Clone, Default)]
pub struct OriginalRequest {
    /// Extra user-agent token the caller wants appended, idempotently, to
    /// the effective `User-Agent` header (e.g. "lib/1.2.3").
    pub user_agent_marker: Option<String>,
}

/// Mutable outgoing call under construction. Mutated by the signer,
/// interceptors, and retry-reset.
#[derive(Debug)]
pub struct Request {
    pub endpoint: String,
    pub service_name: String,
    pub method: http_method::Method,
    pub parameters: Vec<(String, String)>,
    pub headers: HashMap<String, String>,
    pub body: Option<Box<dyn Body>>,
    pub original: Arc<OriginalRequest>,
}

pub mod http_method {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum Method {
        Get,
        Post,
        Put,
        Delete,
        Patch,
        Head,
    }

    impl Method {
        pub fn as_str(&self) -> &'static str {
            match self {
                Method::Get => "GET",
                Method::Post => "POST",
                Method::Put => "PUT",
                Method::Delete => "DELETE",
                Method::Patch => "PATCH",
                Method::Head => "HEAD",
            }
        }
    }
}

impl Request {
    pub fn new(
        endpoint: impl Into<String>,
        service_name: impl Into<String>,
        method: http_method::Method,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            service_name: service_name.into(),
            method,
            parameters: Vec::new(),
            headers: HashMap::new(),
            body: None,
            original: Arc::new(OriginalRequest::default()),
        }
    }

    pub fn with_original(mut self, original: OriginalRequest) -> Self {
        self.original = Arc::new(original);
        self
    }

    pub fn with_body(mut self, body: Box<dyn Body>) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn with_parameter(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.push((name.into(), value.into()));
        self
    }
}

/// Immutable snapshot of [`Request::parameters`] and [`Request::headers`]
/// taken at loop entry, restored before every retry attempt after the first.
#[derive(Debug, Clone)]
pub struct RequestSnapshot {
    pub parameters: Vec<(String, String)>,
    pub headers: HashMap<String, String>,
}

impl RequestSnapshot {
    pub fn capture(request: &Request) -> Self {
        Self {
            parameters: request.parameters.clone(),
            headers: request.headers.clone(),
        }
    }

    pub fn restore(&self, request: &mut Request) {
        request.parameters = self.parameters.clone();
        request.headers = self.headers.clone();
    }
}

/// Transport-ready snapshot of [`Request`], recreated for each attempt. The
/// URI may be overridden after a 307 redirect without touching `Request`
/// itself.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub uri: String,
    pub method: http_method::Method,
    pub headers: HashMap<String, String>,
    pub body: Option<bytes::Bytes>,
}

impl HttpRequest {
    pub fn from_request(request: &Request, redirect_uri: Option<&str>) -> Self {
        Self {
            uri: redirect_uri.unwrap_or(&request.endpoint).to_string(),
            method: request.method,
            headers: request.headers.clone(),
            body: request.body.as_ref().map(|b| bytes::Bytes::copy_from_slice(b.as_bytes())),
        }
    }
}

/// Reset the body between attempts, per §4.4.
pub fn rewind_body(body: Option<&mut Box<dyn Body>>) -> Result<(), ClientError> {
    let Some(body) = body else {
        return Ok(());
    };
    if !body.is_rewindable() {
        return Err(ClientError::new("stream is not resettable"));
    }
    body.reset().map_err(|e| {
        ClientError::with_cause("couldn't reset the stream to retry", e)
    })
}
