//! Sequential gateway fallback fetcher.

use std::time::Duration;

use reqwest::Client as ReqwestClient;
use serde_json::Value;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use super::{candidates_for, is_content_addressed, DEFAULT_GATEWAYS};
use crate::error::{Error, GatewayFailure};

/// Bound on a single gateway attempt (request and body).
pub const DEFAULT_ATTEMPT_TIMEOUT: Duration = Duration::from_secs(10);

/// Resolves `ipfs://` URIs to JSON by trying gateways one after another.
///
/// Each gateway is tried at most once per call, in list order. The first
/// 2xx response with a JSON body wins and later gateways are not contacted.
/// Worst case a call takes `gateways × attempt_timeout`.
#[derive(Debug, Clone)]
pub struct IpfsFetcher {
    http: ReqwestClient,
    gateways: Vec<String>,
    attempt_timeout: Duration,
}

impl Default for IpfsFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl IpfsFetcher {
    /// Fetcher over [`DEFAULT_GATEWAYS`] with a 10 second attempt bound.
    pub fn new() -> Self {
        Self::with_gateways(DEFAULT_GATEWAYS)
    }

    /// Fetcher over custom gateway base URLs (each ending in `/ipfs/` or similar).
    pub fn with_gateways<I, S>(gateways: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            http: ReqwestClient::new(),
            gateways: gateways.into_iter().map(Into::into).collect(),
            attempt_timeout: DEFAULT_ATTEMPT_TIMEOUT,
        }
    }

    /// Sets the per-gateway bound.
    pub fn attempt_timeout(mut self, attempt_timeout: Duration) -> Self {
        self.attempt_timeout = attempt_timeout;
        self
    }

    /// Reuses an existing reqwest client (connection pool).
    pub fn http_client(mut self, http: ReqwestClient) -> Self {
        self.http = http;
        self
    }

    pub fn gateways(&self) -> &[String] {
        &self.gateways
    }

    /// Gateway URLs for `uri`, in try order.
    pub fn candidate_urls(&self, uri: &str) -> Vec<String> {
        candidates_for(uri, self.gateways.iter().map(String::as_str))
    }

    /// Fetches the JSON document behind `uri`.
    ///
    /// # Errors
    ///
    /// [`Error::NotContentAddressed`] without any network call when `uri` is
    /// not `ipfs://`. [`Error::AllGatewaysFailed`] with the last gateway's
    /// failure when no gateway produced JSON.
    pub async fn fetch(&self, uri: &str) -> Result<Value, Error> {
        if !is_content_addressed(uri) {
            return Err(Error::NotContentAddressed(uri.to_string()));
        }

        let mut last_reason =
            GatewayFailure::Transport("no gateways configured".to_string());
        for (attempt, url) in self.candidate_urls(uri).iter().enumerate() {
            debug!(attempt, url = %url, "trying gateway");
            match self.try_gateway(url).await {
                Ok(value) => {
                    info!(attempt, url = %url, "fetched content from gateway");
                    return Ok(value);
                }
                Err(reason) => {
                    warn!(attempt, url = %url, reason = %reason, "gateway attempt failed");
                    last_reason = reason;
                }
            }
        }
        Err(Error::AllGatewaysFailed { last_reason })
    }

    async fn try_gateway(&self, url: &str) -> Result<Value, GatewayFailure> {
        let attempt = async {
            let response = self
                .http
                .get(url)
                .send()
                .await
                .map_err(|e| GatewayFailure::Transport(e.to_string()))?;
            let status = response.status();
            if !status.is_success() {
                return Err(GatewayFailure::Status(status.as_u16()));
            }
            let bytes = response
                .bytes()
                .await
                .map_err(|e| GatewayFailure::Transport(e.to_string()))?;
            let value = serde_json::from_slice::<Value>(&bytes)
                .map_err(|e| GatewayFailure::InvalidJson(e.to_string()))?;
            Ok::<Value, GatewayFailure>(value)
        };

        match timeout(self.attempt_timeout, attempt).await {
            Ok(result) => result,
            Err(_) => Err(GatewayFailure::Timeout(self.attempt_timeout)),
        }
    }
}

/// [`IpfsFetcher::fetch`] over the default gateways.
pub async fn fetch_with_fallback(uri: &str) -> Result<Value, Error> {
    IpfsFetcher::new().fetch(uri).await
}
