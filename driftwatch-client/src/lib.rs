//! Driftwatch GitLab client
//!
//! A small, type-safe client for the parts of the GitLab REST API the
//! divergence monitor needs: projects, branches, merge requests and branch
//! comparison.
//!
//! Every request goes through a [`Fetcher`], which serializes traffic
//! process-wide, paces it with a fixed delay and retries transient failures.
//! List endpoints are walked page by page with [`pagination::collect_all`].
//!
//! # Example
//!
//! ```no_run
//! use driftwatch_client::{ClientOptions, GitlabClient};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = GitlabClient::new("gitlab.example.com", "glpat-token", ClientOptions::default())?;
//!
//!     for project in client.list_projects().await? {
//!         println!("{}", project);
//!     }
//!     Ok(())
//! }
//! ```

mod api;
pub mod error;
pub mod fetcher;
pub mod pagination;
mod projects;
mod repository;
pub mod transport;
pub mod url;

#[cfg(test)]
mod testing;

// Re-export commonly used types
pub use api::GitlabApi;
pub use error::{ClientError, Result};
pub use fetcher::{Fetcher, RetryPolicy};
pub use transport::{HttpTransport, RawResponse, Transport};

use std::sync::Arc;
use std::time::Duration;

/// Construction options for [`GitlabClient`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientOptions {
    /// Attempts per logical request
    pub max_attempts: u32,

    /// Delay held after every request before the next may start
    pub request_delay: Duration,

    /// Keep `http://` base URLs instead of upgrading them to `https://`
    pub allow_insecure: bool,
}

impl Default for ClientOptions {
    fn default() -> Self {
        let policy = RetryPolicy::default();
        Self {
            max_attempts: policy.max_attempts,
            request_delay: policy.request_delay,
            allow_insecure: false,
        }
    }
}

impl ClientOptions {
    fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts,
            request_delay: self.request_delay,
        }
    }
}

/// HTTP client for the GitLab API
///
/// Methods are organized into logical groups:
/// - Project listing
/// - Repository inspection (branches, merge requests, compare)
///
/// Cloning is cheap and clones share the request gate.
#[derive(Clone)]
pub struct GitlabClient {
    /// API root, e.g. "https://gitlab.example.com/api/v4"
    api_url: String,
    /// Serialized, retrying request executor
    fetcher: Fetcher,
}

impl GitlabClient {
    /// Create a new client authenticating with `token`
    ///
    /// # Arguments
    /// * `base_url` - GitLab instance URL; normalized by [`url::normalize_base_url`]
    /// * `token` - Access token sent in the `PRIVATE-TOKEN` header
    /// * `options` - Retry, pacing and scheme options
    pub fn new(base_url: &str, token: impl Into<String>, options: ClientOptions) -> Result<Self> {
        Self::with_transport(base_url, Arc::new(HttpTransport::new(token)), options)
    }

    /// Create a new client on top of a custom transport
    pub fn with_transport(
        base_url: &str,
        transport: Arc<dyn Transport>,
        options: ClientOptions,
    ) -> Result<Self> {
        let api_url = url::normalize_base_url(base_url, options.allow_insecure)?;
        tracing::info!("GitLab api url: {}", api_url);

        Ok(Self {
            api_url,
            fetcher: Fetcher::new(transport, options.retry_policy()),
        })
    }

    /// Get the API root URL
    pub fn api_url(&self) -> &str {
        &self.api_url
    }
}
