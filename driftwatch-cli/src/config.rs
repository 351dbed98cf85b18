//! Configuration module
//!
//! Handles CLI configuration: the GitLab connection settings shared by the
//! remote commands.

use std::sync::Arc;

use anyhow::{Context, Result};
use driftwatch_client::{ClientOptions, GitlabClient};

/// CLI configuration
#[derive(Clone)]
pub struct Config {
    /// GitLab base URL
    pub gitlab_url: Option<String>,

    /// Access token
    pub token: Option<String>,

    /// Keep plain http:// URLs
    pub allow_insecure: bool,
}

impl Config {
    /// Builds a GitLab client, failing when URL or token is missing
    pub fn client(&self) -> Result<Arc<GitlabClient>> {
        let url = self
            .gitlab_url
            .as_deref()
            .context("GitLab URL not set (use --gitlab-url or GITLAB_URL)")?;
        let token = self
            .token
            .as_deref()
            .context("GitLab token not set (use --token or GITLAB_TOKEN)")?;

        let options = ClientOptions {
            allow_insecure: self.allow_insecure,
            ..ClientOptions::default()
        };
        let client = GitlabClient::new(url, token, options).context("Failed to create GitLab client")?;
        Ok(Arc::new(client))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_requires_url_and_token() {
        let config = Config {
            gitlab_url: None,
            token: Some("t".to_string()),
            allow_insecure: false,
        };
        assert!(config.client().is_err());

        let config = Config {
            gitlab_url: Some("gitlab.example.com".to_string()),
            token: None,
            allow_insecure: false,
        };
        assert!(config.client().is_err());
    }

    #[test]
    fn test_client_honours_insecure_flag() {
        let config = Config {
            gitlab_url: Some("http://localhost:8080".to_string()),
            token: Some("t".to_string()),
            allow_insecure: true,
        };
        assert_eq!(config.client().unwrap().api_url(), "http://localhost:8080/api/v4");
    }
}
