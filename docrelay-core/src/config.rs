//! Client configuration
//!
//! The settings bundle shared by the transport and the polling engine.
//! Built once at startup and never mutated afterwards; share it behind an
//! `Arc` when several components need it.

use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Default service endpoint
pub const DEFAULT_BASE_URL: &str = "https://na1.fusion.foxit.com/pdf-services";

/// Default overall wait for a task to reach a terminal state
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(300_000);

/// Default delay between two status polls
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(2_000);

/// Default retry ceiling
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Default bound on a single HTTP request
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Configuration validation failure
#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid configuration: {0}")]
pub struct ConfigError(pub String);

/// Immutable client configuration
///
/// Fields are only set through [`ClientConfig::new`] and the `with_*`
/// builders, so the base URL never keeps a trailing slash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    base_url: String,
    client_id: String,
    client_secret: String,
    default_timeout: Duration,
    poll_interval: Duration,
    max_retries: u32,
    request_timeout: Duration,
}

impl ClientConfig {
    /// Creates a configuration with default timings
    pub fn new(
        base_url: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            default_timeout: DEFAULT_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
            max_retries: DEFAULT_MAX_RETRIES,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    pub fn with_default_timeout(mut self, timeout: Duration) -> Self {
        self.default_timeout = timeout;
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Service base URL, without trailing slash
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Value of the `client_id` header
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// Value of the `client_secret` header
    pub fn client_secret(&self) -> &str {
        &self.client_secret
    }

    /// How long to wait for a task when the caller gives no override
    pub fn default_timeout(&self) -> Duration {
        self.default_timeout
    }

    /// Delay between two status polls
    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Retry ceiling. Accepted for compatibility; no call path retries.
    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Upper bound for any single HTTP request
    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    /// Validates the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.base_url.is_empty() {
            return Err(ConfigError("base_url cannot be empty".into()));
        }

        let url = Url::parse(&self.base_url)
            .map_err(|e| ConfigError(format!("base_url is not a valid URL: {}", e)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError(
                "base_url must start with http:// or https://".into(),
            ));
        }
        if url.host_str().is_none_or(str::is_empty) {
            return Err(ConfigError("base_url has no host".into()));
        }

        if self.client_id.is_empty() || self.client_secret.is_empty() {
            return Err(ConfigError(
                "client_id and client_secret are required".into(),
            ));
        }

        if self.poll_interval.is_zero() {
            return Err(ConfigError("poll_interval must be greater than 0".into()));
        }

        if self.request_timeout.is_zero() {
            return Err(ConfigError(
                "request_timeout must be greater than 0".into(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ClientConfig {
        ClientConfig::new("https://api.example.com/pdf/", "id", "secret")
    }

    #[test]
    fn test_defaults() {
        let config = config();
        assert_eq!(config.base_url, "https://api.example.com/pdf");
        assert_eq!(config.default_timeout, Duration::from_millis(300_000));
        assert_eq!(config.poll_interval, Duration::from_millis(2_000));
        assert_eq!(config.max_retries, 3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_base_url_is_parsed() {
        for bad in ["http://a b", "not a url", "https://exa mple.com/pdf", "mailto:a@b.c"] {
            assert!(ClientConfig::new(bad, "id", "secret").validate().is_err(), "{bad}");
        }

        let config = ClientConfig::new("http://127.0.0.1:9000/pdf-services/", "id", "secret");
        assert_eq!(config.base_url(), "http://127.0.0.1:9000/pdf-services");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builders() {
        let config = config()
            .with_default_timeout(Duration::from_secs(4))
            .with_poll_interval(Duration::from_millis(500))
            .with_max_retries(0)
            .with_request_timeout(Duration::from_secs(5));

        assert_eq!(config.default_timeout, Duration::from_secs(4));
        assert_eq!(config.poll_interval, Duration::from_millis(500));
        assert_eq!(config.max_retries, 0);
        assert_eq!(config.request_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_validation() {
        let mut config = config();

        config.base_url = "ftp://example.com".into();
        assert!(config.validate().is_err());

        config.base_url = "https://".into();
        assert!(config.validate().is_err());

        config.base_url = "http://a b".into();
        assert!(config.validate().is_err());

        config.base_url = "http://localhost:8080".into();
        assert!(config.validate().is_ok());

        config.client_secret = String::new();
        assert!(config.validate().is_err());

        config.client_secret = "secret".into();
        config.poll_interval = Duration::ZERO;
        assert_eq!(
            config.validate(),
            Err(ConfigError("poll_interval must be greater than 0".into()))
        );
    }
}
