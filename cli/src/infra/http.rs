//! `reqwest`-backed implementation of the `Transport` port.

use std::time::Duration;

use anyhow::{Context, Result};
use fleet_common::Method;
use reqwest::header::{self, HeaderMap, HeaderValue};

use crate::application::ports::{RawResponse, Transport};
use crate::domain::ServerConfig;

/// Media type of protobuf request and response bodies.
pub const PROTOBUF_CONTENT_TYPE: &str = "application/x-protobuf";

/// Production transport: one pooled HTTP client per process.
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Build a client honouring the configured timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the TLS backend cannot be initialised.
    pub fn new(server: &ServerConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(PROTOBUF_CONTENT_TYPE));
        headers.insert(header::ACCEPT, HeaderValue::from_static(PROTOBUF_CONTENT_TYPE));
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(server.timeout_secs))
            .user_agent(concat!("fleetctl/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .build()
            .context("failed to create HTTP client")?;
        Ok(Self { client })
    }
}

fn to_reqwest(method: Method) -> reqwest::Method {
    match method {
        Method::Post => reqwest::Method::POST,
        Method::Put => reqwest::Method::PUT,
        Method::Delete => reqwest::Method::DELETE,
    }
}

impl Transport for HttpTransport {
    async fn send(&self, method: Method, url: &str, body: Vec<u8>) -> Result<RawResponse> {
        let response = self
            .client
            .request(to_reqwest(method), url)
            .body(body)
            .send()
            .await
            .with_context(|| format!("{method} {url}"))?;
        let status = response.status();
        // A body that cannot be read is reported as missing, not as a
        // transport failure: the status line did arrive.
        let body = match response.bytes().await {
            Ok(bytes) => Some(bytes.to_vec()),
            Err(err) => {
                tracing::debug!(error = %err, "response body unreadable");
                None
            }
        };
        Ok(RawResponse {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
            body,
        })
    }
}
