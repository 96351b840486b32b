//! HTTP transport for snapshot uploads.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use thiserror::Error;
use tracing::debug;

use crate::error::{Result, ResultExt};

/// Whole-request timeout for uploads.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Status line and body of an HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpReply {
    pub status: u16,
    /// Reason phrase, e.g. "Bad Request".
    pub reason: String,
    pub body: String,
}

impl HttpReply {
    /// Reply with the canonical reason phrase for `status`.
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            reason: canonical_reason(status).to_string(),
            body: body.into(),
        }
    }
}

/// Canonical reason phrase for a status code, or "" if unknown.
pub fn canonical_reason(status: u16) -> &'static str {
    reqwest::StatusCode::from_u16(status)
        .ok()
        .and_then(|s| s.canonical_reason())
        .unwrap_or("")
}

/// A request that produced no HTTP response.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("Request failed: {0}")]
    Request(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Response body could not be read: {0}")]
    Body(String),
}

/// Seam between the upload client and the network.
pub trait Transport {
    /// POST `body` as JSON to `url` with `Authorization: Basic {token}`.
    fn post_json(
        &self,
        url: &str,
        token: &str,
        body: Vec<u8>,
    ) -> std::result::Result<HttpReply, TransportError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn post_json(
        &self,
        url: &str,
        token: &str,
        body: Vec<u8>,
    ) -> std::result::Result<HttpReply, TransportError> {
        (**self).post_json(url, token, body)
    }
}

/// A transport that could not be constructed fails every request with the
/// construction error.
impl<T: Transport> Transport for std::result::Result<T, TransportError> {
    fn post_json(
        &self,
        url: &str,
        token: &str,
        body: Vec<u8>,
    ) -> std::result::Result<HttpReply, TransportError> {
        match self {
            Ok(transport) => transport.post_json(url, token, body),
            Err(e) => Err(e.clone()),
        }
    }
}

/// Blocking reqwest transport.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("hwmd/", env!("CARGO_PKG_VERSION")))
            .build()
            .with_context(|| "Building HTTP client")?;
        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    fn post_json(
        &self,
        url: &str,
        token: &str,
        body: Vec<u8>,
    ) -> std::result::Result<HttpReply, TransportError> {
        debug!(url, bytes = body.len(), "POST snapshot");
        let response = self
            .client
            .post(url)
            .header(AUTHORIZATION, format!("Basic {token}"))
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .map_err(|e| {
                if e.is_timeout() {
                    TransportError::Timeout(e.to_string())
                } else {
                    TransportError::Request(e.to_string())
                }
            })?;

        let status = response.status();
        let body = response
            .text()
            .map_err(|e| TransportError::Body(e.to_string()))?;

        Ok(HttpReply {
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or("").to_string(),
            body,
        })
    }
}
