//! Per-call execution context (§3 `ExecutionContext`).

use std::sync::Arc;

use crate::credentials::Credentials;
use crate::interceptor::InterceptorChain;
use crate::signer::SignerResolver;

/// Scratch space created fresh for each `execute` call and discarded
/// afterward. The signer resolver is usually shared with the client, but is
/// threaded through explicitly so a single execution loop can serve several
/// differently-configured clients in tests.
pub struct ExecutionContext {
    pub credentials: Option<Credentials>,
    pub interceptors: InterceptorChain,
    pub signer_resolver: Arc<dyn SignerResolver>,
}

impl ExecutionContext {
    pub fn new(signer_resolver: Arc<dyn SignerResolver>) -> Self {
        Self {
            credentials: None,
            interceptors: InterceptorChain::new(),
            signer_resolver,
        }
    }

    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    pub fn with_interceptors(mut self, interceptors: InterceptorChain) -> Self {
        self.interceptors = interceptors;
        self
    }
}
