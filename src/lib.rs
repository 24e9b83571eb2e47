//! Request execution core: signs, transmits, classifies and retries calls
//! to a family of HTTP-based remote services, correcting for clock skew and
//! invoking user-supplied interceptors along the way.
//!
//! The execution loop ([`execution::execute`]) is the centerpiece; every
//! other module is a collaborator it composes.

#![deny(unsafe_code)]

pub mod classify;
pub mod client;
pub mod clock;
pub mod config;
pub mod credentials;
pub mod error;
pub mod execution;
pub mod interceptor;
pub mod request;
pub mod response;
pub mod retry;
pub mod signer;
pub mod transport;
pub mod unmarshal;

pub use client::Client;
pub use credentials::Credentials;
pub use error::{ClientError, ExecutionError, ServiceError};
pub use execution::{execute, ExecutionContext};
pub use request::Request;
pub use response::Response;
