//! Configuration module
//!
//! Turns command-line flags and environment variables into the client
//! configuration shared by every command. Credentials are only checked by
//! commands that talk to the service.

use anyhow::{Context, Result, bail};
use docrelay_client::DocumentClient;
use docrelay_core::ClientConfig;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// CLI configuration
#[derive(Debug, Clone)]
pub struct Config {
    base_url: String,
    client_id: Option<String>,
    client_secret: Option<String>,
    timeout: Duration,
    poll_interval: Duration,
    request_timeout: Duration,
}

impl Config {
    /// Collect the settings, deferring validation to [`Config::client_config`]
    pub fn new(
        base_url: &str,
        client_id: Option<&str>,
        client_secret: Option<&str>,
        timeout_ms: u64,
        poll_interval_ms: u64,
        request_timeout_secs: u64,
    ) -> Self {
        Self {
            base_url: base_url.to_string(),
            client_id: client_id.map(str::to_string),
            client_secret: client_secret.map(str::to_string),
            timeout: Duration::from_millis(timeout_ms),
            poll_interval: Duration::from_millis(poll_interval_ms),
            request_timeout: Duration::from_secs(request_timeout_secs),
        }
    }

    /// Build and validate the client settings
    pub fn client_config(&self) -> Result<Arc<ClientConfig>> {
        let (Some(client_id), Some(client_secret)) = (&self.client_id, &self.client_secret) else {
            bail!("DOCRELAY_CLIENT_ID and DOCRELAY_CLIENT_SECRET are required for this command");
        };

        let client = ClientConfig::new(&self.base_url, client_id, client_secret)
            .with_default_timeout(self.timeout)
            .with_poll_interval(self.poll_interval)
            .with_request_timeout(self.request_timeout);

        client
            .validate()
            .context("Check DOCRELAY_API_BASE_URL, DOCRELAY_CLIENT_ID and DOCRELAY_CLIENT_SECRET")?;

        debug!(
            "Using {} (timeout {:?}, poll interval {:?}, request timeout {:?})",
            client.base_url(),
            client.default_timeout(),
            client.poll_interval(),
            client.request_timeout()
        );

        Ok(Arc::new(client))
    }

    /// Create a client for the configured service
    pub fn connect(&self) -> Result<DocumentClient> {
        DocumentClient::from_shared(self.client_config()?)
            .context("Failed to create document service client")
    }
}
