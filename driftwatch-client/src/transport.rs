//! HTTP transport
//!
//! The transport performs exactly one HTTP exchange and hands back the raw
//! status and body. Retrying, pacing and decoding live in the fetcher, which
//! keeps the transport trivially replaceable in tests.

use async_trait::async_trait;
use reqwest::{Client, Method};
use serde_json::Value;
use tracing::debug;

use crate::error::{ClientError, Result};

/// Header GitLab reads personal/project access tokens from
pub const TOKEN_HEADER: &str = "PRIVATE-TOKEN";

/// Raw outcome of one HTTP exchange
#[derive(Debug, Clone)]
pub struct RawResponse {
    /// HTTP status code
    pub status: u16,
    /// Response body as text
    pub body: String,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Whether the status is within 200-299
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// One-shot HTTP exchange
#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends a single request
    ///
    /// Returns `ClientError::Transport` when no response was received.
    /// Any received response, whatever its status, is `Ok`.
    async fn send(&self, method: Method, url: &str, body: Option<&Value>) -> Result<RawResponse>;
}

/// reqwest-backed transport authenticating with a GitLab access token
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    token: String,
}

impl HttpTransport {
    /// Creates a transport with a default reqwest client
    pub fn new(token: impl Into<String>) -> Self {
        Self::with_client(Client::new(), token)
    }

    /// Creates a transport with a custom reqwest client
    ///
    /// This allows you to configure timeouts, proxies, TLS settings, etc.
    pub fn with_client(client: Client, token: impl Into<String>) -> Self {
        Self {
            client,
            token: token.into(),
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, method: Method, url: &str, body: Option<&Value>) -> Result<RawResponse> {
        debug!("{} {}", method, url);

        let mut request = self
            .client
            .request(method, url)
            .header(TOKEN_HEADER, &self.token);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| ClientError::Transport(format!("failed to read response body: {}", e)))?;

        Ok(RawResponse { status, body })
    }
}
