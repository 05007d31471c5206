//! Error types for the Praxis SDK.

use std::fmt;
use std::time::Duration;

use thiserror::Error;

/// Errors that can occur when using the Praxis SDK.
#[derive(Error, Debug)]
pub enum Error {
    /// HTTP request failed before a status was received.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization or deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The directory API answered with a non-2xx status.
    #[error("API error: {status} {body}")]
    RemoteApi { status: u16, body: String },

    /// A single-resource endpoint returned `null` or an unparseable body.
    #[error("Empty response")]
    EmptyResponse,

    /// The URI does not use the `ipfs://` scheme.
    #[error("not a content-addressed uri: {0}")]
    NotContentAddressed(String),

    /// Every gateway was tried once and none produced JSON.
    #[error("all IPFS gateways failed: {last_reason}")]
    AllGatewaysFailed { last_reason: GatewayFailure },

    /// Building the underlying reqwest client failed.
    #[error("failed to build http client: {0}")]
    ClientBuildFailed(String),

    /// A configuration value could not be parsed.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Why one gateway attempt failed. Only the last one reaches the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayFailure {
    /// Gateway answered with a non-2xx status.
    Status(u16),
    /// Connection, TLS or body read error.
    Transport(String),
    /// The attempt exceeded the per-gateway bound and was cancelled.
    Timeout(Duration),
    /// 2xx response whose body is not JSON.
    InvalidJson(String),
}

impl fmt::Display for GatewayFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GatewayFailure::Status(code) => write!(f, "HTTP {}", code),
            GatewayFailure::Transport(e) => write!(f, "transport error: {}", e),
            GatewayFailure::Timeout(d) => write!(f, "timed out after {}ms", d.as_millis()),
            GatewayFailure::InvalidJson(e) => write!(f, "invalid JSON: {}", e),
        }
    }
}
