//! Daemon configuration
//!
//! Defines all configurable parameters for the daemon: the GitLab
//! connection, the two polling intervals and the request pacing policy.

use std::fmt;
use std::time::Duration;

use driftwatch_client::ClientOptions;

use crate::fleet::FleetSettings;

/// Daemon configuration
#[derive(Clone)]
pub struct Config {
    /// GitLab base URL (e.g., "https://gitlab.example.com")
    pub gitlab_url: String,

    /// Access token sent in the PRIVATE-TOKEN header
    pub token: String,

    /// How often the project list is refreshed
    pub repo_list_interval: Duration,

    /// How often each repository is checked
    pub repo_interval: Duration,

    /// Delay held after every request before the next may start
    pub request_delay: Duration,

    /// Attempts per logical request
    pub max_attempts: u32,

    /// Keep plain http:// GitLab URLs instead of upgrading them
    pub allow_insecure: bool,
}

impl Config {
    /// Creates a new configuration with default intervals
    pub fn new(gitlab_url: String, token: String) -> Self {
        let fleet = FleetSettings::default();
        let client = ClientOptions::default();
        Self {
            gitlab_url,
            token,
            repo_list_interval: fleet.repo_list_interval,
            repo_interval: fleet.repo_interval,
            request_delay: client.request_delay,
            max_attempts: client.max_attempts,
            allow_insecure: client.allow_insecure,
        }
    }

    /// Creates configuration from environment variables
    ///
    /// Expected environment variables:
    /// - GITLAB_URL (required)
    /// - GITLAB_TOKEN (required)
    /// - REPO_LIST_INTERVAL (optional, seconds, default: 300)
    /// - REPO_INTERVAL (optional, seconds, default: 60)
    /// - REQUEST_DELAY_MS (optional, milliseconds, default: 100)
    /// - MAX_ATTEMPTS (optional, default: 3)
    /// - GITLAB_INSECURE (optional, "true"/"1" to keep http://, default: false)
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Creates configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let gitlab_url = lookup("GITLAB_URL")
            .ok_or_else(|| anyhow::anyhow!("GITLAB_URL environment variable not set"))?;

        let token = lookup("GITLAB_TOKEN")
            .ok_or_else(|| anyhow::anyhow!("GITLAB_TOKEN environment variable not set"))?;

        let mut config = Self::new(gitlab_url, token);

        if let Some(secs) = parse(&lookup, "REPO_LIST_INTERVAL")? {
            config.repo_list_interval = Duration::from_secs(secs);
        }

        if let Some(secs) = parse(&lookup, "REPO_INTERVAL")? {
            config.repo_interval = Duration::from_secs(secs);
        }

        if let Some(ms) = parse(&lookup, "REQUEST_DELAY_MS")? {
            config.request_delay = Duration::from_millis(ms);
        }

        if let Some(attempts) = parse(&lookup, "MAX_ATTEMPTS")? {
            config.max_attempts = attempts;
        }

        if let Some(value) = lookup("GITLAB_INSECURE") {
            config.allow_insecure = matches!(value.trim(), "1" | "true" | "TRUE" | "yes");
        }

        Ok(config)
    }

    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.gitlab_url.trim().is_empty() {
            anyhow::bail!("gitlab_url cannot be empty");
        }

        if self.token.is_empty() {
            anyhow::bail!("token cannot be empty");
        }

        if self.repo_list_interval.is_zero() {
            anyhow::bail!("repo_list_interval must be greater than 0");
        }

        if self.repo_interval.is_zero() {
            anyhow::bail!("repo_interval must be greater than 0");
        }

        if self.max_attempts == 0 {
            anyhow::bail!("max_attempts must be greater than 0");
        }

        Ok(())
    }

    pub fn client_options(&self) -> ClientOptions {
        ClientOptions {
            max_attempts: self.max_attempts,
            request_delay: self.request_delay,
            allow_insecure: self.allow_insecure,
        }
    }

    pub fn fleet_settings(&self) -> FleetSettings {
        FleetSettings {
            repo_list_interval: self.repo_list_interval,
            repo_interval: self.repo_interval,
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("gitlab_url", &self.gitlab_url)
            .field("token", &"<redacted>")
            .field("repo_list_interval", &self.repo_list_interval)
            .field("repo_interval", &self.repo_interval)
            .field("request_delay", &self.request_delay)
            .field("max_attempts", &self.max_attempts)
            .field("allow_insecure", &self.allow_insecure)
            .finish()
    }
}

fn parse<F, T>(lookup: &F, key: &str) -> anyhow::Result<Option<T>>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| anyhow::anyhow!("invalid {} value {:?}: {}", key, raw, e)),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[
            ("GITLAB_URL", "https://gitlab.example.com"),
            ("GITLAB_TOKEN", "glpat-secret"),
        ]))
        .unwrap();

        assert_eq!(config.repo_list_interval, Duration::from_secs(300));
        assert_eq!(config.repo_interval, Duration::from_secs(60));
        assert_eq!(config.request_delay, Duration::from_millis(100));
        assert_eq!(config.max_attempts, 3);
        assert!(!config.allow_insecure);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("GITLAB_URL", "http://localhost:8080"),
            ("GITLAB_TOKEN", "t"),
            ("REPO_LIST_INTERVAL", "600"),
            ("REPO_INTERVAL", " 15 "),
            ("REQUEST_DELAY_MS", "0"),
            ("MAX_ATTEMPTS", "5"),
            ("GITLAB_INSECURE", "true"),
        ]))
        .unwrap();

        assert_eq!(config.fleet_settings().repo_list_interval, Duration::from_secs(600));
        assert_eq!(config.fleet_settings().repo_interval, Duration::from_secs(15));

        let options = config.client_options();
        assert_eq!(options.request_delay, Duration::ZERO);
        assert_eq!(options.max_attempts, 5);
        assert!(options.allow_insecure);
    }

    #[test]
    fn test_missing_required_variables() {
        assert!(Config::from_lookup(lookup(&[("GITLAB_TOKEN", "t")])).is_err());
        assert!(Config::from_lookup(lookup(&[("GITLAB_URL", "gitlab.example.com")])).is_err());
    }

    #[test]
    fn test_malformed_number_is_an_error() {
        let err = Config::from_lookup(lookup(&[
            ("GITLAB_URL", "gitlab.example.com"),
            ("GITLAB_TOKEN", "t"),
            ("REPO_INTERVAL", "1m"),
        ]))
        .unwrap_err();

        assert!(err.to_string().contains("REPO_INTERVAL"));
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::new("gitlab.example.com".to_string(), "t".to_string());
        assert!(config.validate().is_ok());

        config.repo_interval = Duration::ZERO;
        assert!(config.validate().is_err());
        config.repo_interval = Duration::from_secs(1);

        config.max_attempts = 0;
        assert!(config.validate().is_err());
        config.max_attempts = 1;

        config.token = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_debug_redacts_token() {
        let config = Config::new("gitlab.example.com".to_string(), "glpat-secret".to_string());
        let rendered = format!("{:?}", config);

        assert!(!rendered.contains("glpat-secret"));
        assert!(rendered.contains("<redacted>"));
    }
}
