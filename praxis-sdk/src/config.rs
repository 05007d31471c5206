//! Configuration for the Praxis explorer client.
//!
//! - `PRAXIS_API_URL`: explorer API base URL; falls back to `PRAXIS_EXPLORER_URL`,
//!   then `http://localhost:8080`. A trailing `/` is dropped.
//! - `PRAXIS_HTTP_TIMEOUT_SECS`: overall directory request timeout (default 30).
//! - `PRAXIS_IPFS_TIMEOUT_SECS`: per-gateway attempt bound (default 10).

use std::time::Duration;

use crate::client::{Client, DEFAULT_TIMEOUT};
use crate::ipfs::{IpfsFetcher, DEFAULT_ATTEMPT_TIMEOUT};
use crate::Error;

const DEFAULT_API_URL: &str = "http://localhost:8080";

/// Resolved client configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExplorerConfig {
    pub api_base_url: String,
    pub http_timeout: Duration,
    pub ipfs_attempt_timeout: Duration,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_string(),
            http_timeout: DEFAULT_TIMEOUT,
            ipfs_attempt_timeout: DEFAULT_ATTEMPT_TIMEOUT,
        }
    }
}

impl ExplorerConfig {
    /// Reads the process environment. Callers that use `.env` files should
    /// load them before calling this.
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolves configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_base_url = lookup("PRAXIS_API_URL")
            .or_else(|| lookup("PRAXIS_EXPLORER_URL"))
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let api_base_url = api_base_url
            .strip_suffix('/')
            .unwrap_or(&api_base_url)
            .to_string();

        Ok(Self {
            api_base_url,
            http_timeout: secs(&lookup, "PRAXIS_HTTP_TIMEOUT_SECS", DEFAULT_TIMEOUT)?,
            ipfs_attempt_timeout: secs(
                &lookup,
                "PRAXIS_IPFS_TIMEOUT_SECS",
                DEFAULT_ATTEMPT_TIMEOUT,
            )?,
        })
    }

    /// Builds the directory client.
    pub fn client(&self) -> Result<Client, Error> {
        Client::builder(self.api_base_url.clone())
            .timeout(self.http_timeout)
            .user_agent(concat!("praxis-sdk/", env!("CARGO_PKG_VERSION")))
            .try_build()
    }

    /// Builds the gateway fetcher over the default gateways.
    pub fn ipfs_fetcher(&self) -> IpfsFetcher {
        IpfsFetcher::new().attempt_timeout(self.ipfs_attempt_timeout)
    }
}

fn secs<F>(lookup: &F, key: &str, default: Duration) -> Result<Duration, Error>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse::<u64>()
            .map(Duration::from_secs)
            .map_err(|e| Error::InvalidConfig(format!("{}={:?}: {}", key, raw, e))),
    }
}
