//! Opaque auth material supplied per execution by the caller's context.
//!
//! The core never inspects the contents; it only hands `Credentials` to the
//! resolved [`crate::signer::Signer`] and to credential-aware interceptors.

use secrecy::{ExposeSecret, SecretString};

#[derive(Clone)]
pub struct Credentials {
    access_key: SecretString,
    secret_key: SecretString,
    session_token: Option<SecretString>,
}

impl Credentials {
    pub fn new(access_key: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            access_key: access_key.into().into(),
            secret_key: secret_key.into().into(),
            session_token: None,
        }
    }

    pub fn with_session_token(mut self, token: impl Into<String>) -> Self {
        self.session_token = Some(token.into().into());
        self
    }

    /// A bearer-token-only credential, for services that don't use an
    /// access/secret key pair.
    pub fn bearer(token: impl Into<String>) -> Self {
        Self {
            access_key: SecretString::from(String::new()),
            secret_key: token.into().into(),
            session_token: None,
        }
    }

    pub fn access_key(&self) -> &str {
        self.access_key.expose_secret()
    }

    pub fn secret_key(&self) -> &str {
        self.secret_key.expose_secret()
    }

    pub fn session_token(&self) -> Option<&str> {
        self.session_token.as_ref().map(|s| s.expose_secret())
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key", &"[redacted]")
            .field("secret_key", &"[redacted]")
            .field("session_token", &self.session_token.as_ref().map(|_| "[redacted]"))
            .finish()
    }
}
