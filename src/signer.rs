//! Request signing (§4.2).

use crate::clock::Clock;
use crate::credentials::Credentials;
use crate::error::ClientError;
use crate::request::Request;

/// Mutates a [`Request`] in place to attach auth material: headers, query
/// parameters, whatever the scheme requires. Signing happens once per
/// attempt, after the snapshot is restored and before the body is rewound.
pub trait Signer: Send + Sync {
    fn sign(
        &self,
        request: &mut Request,
        credentials: &Credentials,
        clock: &dyn Clock,
    ) -> Result<(), ClientError>;
}

/// Resolves the signer to use for a given service, so a single client can
/// talk to several services with different signing schemes.
pub trait SignerResolver: Send + Sync {
    fn signer_for(&self, service_name: &str) -> Option<std::sync::Arc<dyn Signer>>;
}

/// A resolver carrying exactly one signer, used regardless of service name.
/// The common case: a client that only ever talks to one service.
pub struct SingleSigner(pub std::sync::Arc<dyn Signer>);

impl SignerResolver for SingleSigner {
    fn signer_for(&self, _service_name: &str) -> Option<std::sync::Arc<dyn Signer>> {
        Some(self.0.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[derive(Default)]
    struct CountingSigner {
        calls: AtomicUsize,
    }

    impl Signer for CountingSigner {
        fn sign(
            &self,
            request: &mut Request,
            credentials: &Credentials,
            _clock: &dyn Clock,
        ) -> Result<(), ClientError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            request
                .headers
                .insert("Authorization".to_string(), credentials.access_key().to_string());
            Ok(())
        }
    }

    #[test]
    fn single_signer_resolves_the_same_signer_for_any_service() {
        let signer: Arc<dyn Signer> = Arc::new(CountingSigner::default());
        let resolver = SingleSigner(signer.clone());
        assert!(resolver.signer_for("svc-a").is_some());
        assert!(resolver.signer_for("svc-b").is_some());
    }

    #[test]
    fn signer_mutates_request_headers() {
        let signer = CountingSigner::default();
        let mut request = Request::new("https://example.test", "svc", crate::request::http_method::Method::Get);
        let credentials = Credentials::new("AKIA", "secret");
        let clock = crate::clock::SystemClock;

        signer.sign(&mut request, &credentials, &clock).unwrap();
        signer.sign(&mut request, &credentials, &clock).unwrap();

        assert_eq!(signer.calls.load(Ordering::SeqCst), 2);
        assert_eq!(request.headers.get("Authorization").map(String::as_str), Some("AKIA"));
    }
}
