//! Scripted in-memory transport for unit tests

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Method;
use serde_json::Value;

use crate::error::{ClientError, Result};
use crate::transport::{RawResponse, Transport};

/// Replays queued responses in order and records every requested URL.
/// Once the script runs out, `fallback` is returned forever.
pub struct ScriptedTransport {
    script: Mutex<VecDeque<Result<RawResponse>>>,
    fallback: Option<RawResponse>,
    requests: Mutex<Vec<String>>,
    latency: Duration,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            fallback: None,
            requests: Mutex::new(Vec::new()),
            latency: Duration::ZERO,
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    pub fn respond(self, status: u16, body: impl Into<String>) -> Self {
        self.script
            .lock()
            .unwrap()
            .push_back(Ok(RawResponse::new(status, body)));
        self
    }

    pub fn fail(self, message: &str) -> Self {
        self.script
            .lock()
            .unwrap()
            .push_back(Err(ClientError::Transport(message.to_string())));
        self
    }

    pub fn otherwise(mut self, status: u16, body: impl Into<String>) -> Self {
        self.fallback = Some(RawResponse::new(status, body));
        self
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, _method: Method, url: &str, _body: Option<&Value>) -> Result<RawResponse> {
        self.requests.lock().unwrap().push(url.to_string());

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        let next = self.script.lock().unwrap().pop_front();
        match next {
            Some(outcome) => outcome,
            None => match &self.fallback {
                Some(response) => Ok(response.clone()),
                None => Err(ClientError::Transport(format!("unscripted request to {}", url))),
            },
        }
    }
}

/// JSON array of `count` branch-shaped objects named `{prefix}-{n}`
pub fn branch_page(prefix: &str, count: usize) -> String {
    let items: Vec<Value> = (0..count)
        .map(|n| serde_json::json!({ "name": format!("{}-{}", prefix, n) }))
        .collect();
    Value::Array(items).to_string()
}
