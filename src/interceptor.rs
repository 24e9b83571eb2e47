//! Interceptor chain (§5).
//!
//! Interceptors observe and adjust the request/response lifecycle without
//! the execution loop needing to know their concrete types. Credential
//! injection is capability-based — `wants_credentials()`/`inject_credentials()`
//! — rather than the loop downcasting each interceptor to see if it cares
//! (see SPEC_FULL.md §5.1, REDESIGN).

use std::sync::Arc;

use crate::credentials::Credentials;
use crate::error::ExecutionError;
use crate::request::Request;
use crate::response::HttpResponse;

pub trait Interceptor: Send + Sync {
    /// Called exactly once per `execute` call, before the attempt loop
    /// starts (so before signing, before any HTTP request is built).
    fn before_request(&self, _request: &mut Request) {}

    /// Called exactly once per `execute` call that terminates successfully,
    /// with the response from the winning attempt.
    fn after_response(&self, _request: &Request, _response: &HttpResponse) {}

    /// Called exactly once per `execute` call that terminates with an
    /// error, with the terminal error.
    fn after_error(&self, _request: &Request, _error: &ExecutionError) {}

    /// Whether this interceptor wants to see the resolved credentials for
    /// the current attempt. Most interceptors don't; returning `false` (the
    /// default) means `inject_credentials` is never called.
    fn wants_credentials(&self) -> bool {
        false
    }

    /// Called once per attempt, before `before_request`, only if
    /// `wants_credentials()` is true.
    fn inject_credentials(&self, _credentials: &Credentials) {}
}

/// An ordered list of interceptors, invoked in registration order for
/// `before_request`/credential injection and in the same order for the
/// response/error hooks (the spec doesn't call for reversal on the way out).
#[derive(Clone, Default)]
pub struct InterceptorChain {
    interceptors: Vec<Arc<dyn Interceptor>>,
}

impl InterceptorChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, interceptor: Arc<dyn Interceptor>) {
        self.interceptors.push(interceptor);
    }

    pub fn inject_credentials(&self, credentials: &Credentials) {
        for interceptor in &self.interceptors {
            if interceptor.wants_credentials() {
                interceptor.inject_credentials(credentials);
            }
        }
    }

    pub fn before_request(&self, request: &mut Request) {
        for interceptor in &self.interceptors {
            interceptor.before_request(request);
        }
    }

    pub fn after_response(&self, request: &Request, response: &HttpResponse) {
        for interceptor in &self.interceptors {
            interceptor.after_response(request, response);
        }
    }

    pub fn after_error(&self, request: &Request, error: &ExecutionError) {
        for interceptor in &self.interceptors {
            interceptor.after_error(request, error);
        }
    }
}
