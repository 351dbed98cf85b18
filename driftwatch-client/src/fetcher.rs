//! Resilient fetcher
//!
//! Issues one logical request against the API:
//! - all requests in the process go through a single gate, so at most one is
//!   in flight at any time
//! - the gate stays held for a fixed pacing delay after every exchange
//! - transport failures and non-2xx statuses are retried up to a bound
//! - successful bodies are decoded into the caller's type

use std::sync::Arc;
use std::time::Duration;

use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, error, warn};

use crate::error::{ClientError, Result};
use crate::transport::{RawResponse, Transport};

/// Retry and pacing policy for the fetcher
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Attempts per logical request (zero is treated as one)
    pub max_attempts: u32,
    /// Delay held on the gate after every exchange
    pub request_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            request_delay: Duration::from_millis(100),
        }
    }
}

/// Serialized, retrying request executor
///
/// Clones share the same gate.
#[derive(Clone)]
pub struct Fetcher {
    transport: Arc<dyn Transport>,
    gate: Arc<Mutex<()>>,
    policy: RetryPolicy,
}

impl Fetcher {
    pub fn new(transport: Arc<dyn Transport>, policy: RetryPolicy) -> Self {
        Self {
            transport,
            gate: Arc::new(Mutex::new(())),
            policy,
        }
    }

    /// GET `url` and decode the body
    pub async fn get<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        self.fetch(Method::GET, url, None).await
    }

    /// Performs a request with retries and decodes the successful body
    ///
    /// Every retry re-acquires the gate and repeats the request unchanged.
    /// After the last failed attempt the final error is wrapped in
    /// `ClientError::RequestExhausted`. Decode failures are not retried.
    pub async fn fetch<T: DeserializeOwned>(
        &self,
        method: Method,
        url: &str,
        body: Option<&Value>,
    ) -> Result<T> {
        let max_attempts = self.policy.max_attempts.max(1);
        let mut attempt = 0;

        loop {
            attempt += 1;

            let failure = match self.exchange(method.clone(), url, body).await {
                Ok(response) if response.is_success() => return decode(url, &response),
                Ok(response) => ClientError::status(response.status, url, response.body),
                Err(e) => e,
            };

            if attempt >= max_attempts {
                error!("Request to {} failed after {} attempt(s): {}", url, attempt, failure);
                return Err(ClientError::RequestExhausted {
                    url: url.to_string(),
                    attempts: attempt,
                    last: Box::new(failure),
                });
            }

            warn!(
                "Request to {} failed (attempt {}/{}): {}",
                url, attempt, max_attempts, failure
            );
        }
    }

    /// One exchange under the gate, followed by the pacing delay
    async fn exchange(&self, method: Method, url: &str, body: Option<&Value>) -> Result<RawResponse> {
        let _gate = self.gate.lock().await;

        let result = self.transport.send(method, url, body).await;

        if !self.policy.request_delay.is_zero() {
            tokio::time::sleep(self.policy.request_delay).await;
        }

        result
    }
}

fn decode<T: DeserializeOwned>(url: &str, response: &RawResponse) -> Result<T> {
    match serde_json::from_str(&response.body) {
        Ok(value) => {
            debug!("Decoded response from {}", url);
            Ok(value)
        }
        Err(e) => {
            let err = ClientError::decode(url, &response.body, &e);
            error!("Error decoding gitlab response: {}", err);
            error!("Check PRIVATE-TOKEN validity");
            Err(err)
        }
    }
}
