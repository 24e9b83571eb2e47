//! Transport adapter (§6) — opaque to the core. Must not retry internally;
//! all retry decisions live in the execution loop.

use async_trait::async_trait;

use crate::error::ClientError;
use crate::request::HttpRequest;
use crate::response::HttpResponse;

#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ClientError>;
}

/// A thin [`reqwest`]-backed transport. Concrete signers, unmarshallers and
/// retry policy live elsewhere; this is just the wire.
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl Default for ReqwestTransport {
    fn default() -> Self {
        Self::new(reqwest::Client::new())
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ClientError> {
        let method = match request.method {
            crate::request::http_method::Method::Get => reqwest::Method::GET,
            crate::request::http_method::Method::Post => reqwest::Method::POST,
            crate::request::http_method::Method::Put => reqwest::Method::PUT,
            crate::request::http_method::Method::Delete => reqwest::Method::DELETE,
            crate::request::http_method::Method::Patch => reqwest::Method::PATCH,
            crate::request::http_method::Method::Head => reqwest::Method::HEAD,
        };

        let mut builder = self.client.request(method, &request.uri);
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| ClientError::with_cause(format!("Unable to execute HTTP request: {e}"), e))?;

        let status_code = response.status().as_u16();
        let status_text = response
            .status()
            .canonical_reason()
            .unwrap_or("")
            .to_string();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(k, v)| v.to_str().ok().map(|v| (k.as_str().to_string(), v.to_string())))
            .collect();
        let body = response
            .bytes()
            .await
            .map_err(|e| ClientError::with_cause(format!("Unable to execute HTTP request: {e}"), e))?;

        Ok(HttpResponse {
            status_code,
            status_text,
            headers,
            body: Some(body),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Replays a single scripted response, recording the URI it was asked
    /// to hit — just enough to exercise the `Transport` contract itself
    /// (the execution loop's own tests use a richer multi-step fake).
    struct OneShotTransport {
        response: Mutex<Option<HttpResponse>>,
        requested_uri: Mutex<Option<String>>,
    }

    #[async_trait]
    impl Transport for OneShotTransport {
        async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ClientError> {
            *self.requested_uri.lock().unwrap() = Some(request.uri);
            self.response
                .lock()
                .unwrap()
                .take()
                .ok_or_else(|| ClientError::new("script exhausted"))
        }
    }

    #[tokio::test]
    async fn transport_receives_the_prepared_uri_and_headers() {
        let transport = OneShotTransport {
            response: Mutex::new(Some(HttpResponse {
                status_code: 200,
                status_text: "OK".to_string(),
                headers: HashMap::new(),
                body: Some(bytes::Bytes::from_static(b"hi")),
            })),
            requested_uri: Mutex::new(None),
        };

        let request = HttpRequest {
            uri: "https://example.test/a".to_string(),
            method: crate::request::http_method::Method::Get,
            headers: HashMap::new(),
            body: None,
        };

        let response = transport.execute(request).await.unwrap();
        assert_eq!(response.status_code, 200);
        assert_eq!(
            transport.requested_uri.lock().unwrap().as_deref(),
            Some("https://example.test/a")
        );
    }

    #[tokio::test]
    async fn exhausted_script_yields_a_client_error() {
        let transport = OneShotTransport {
            response: Mutex::new(None),
            requested_uri: Mutex::new(None),
        };
        let request = HttpRequest {
            uri: "https://example.test/a".to_string(),
            method: crate::request::http_method::Method::Get,
            headers: HashMap::new(),
            body: None,
        };
        assert!(transport.execute(request).await.is_err());
    }
}
