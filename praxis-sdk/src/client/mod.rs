//! HTTP client for the Praxis explorer API.

mod builder;

use crate::Error;
use reqwest::{Client as ReqwestClient, Response};
use std::time::Duration;

pub use builder::ClientBuilder;

/// Default overall timeout for directory requests.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Praxis explorer API client.
///
/// Holds no per-call state; clones share the connection pool and every
/// call is an independent round trip.
#[derive(Debug, Clone)]
pub struct Client {
    pub(crate) base_url: String,
    pub(crate) http: ReqwestClient,
}

impl Client {
    /// Creates a new client for the given base URL.
    ///
    /// Panics if the underlying reqwest client fails to build (e.g. TLS init).
    /// For fallible construction use [`Client::builder`](Self::builder)(base_url).try_build().
    ///
    /// # Example
    ///
    /// ```
    /// use praxis_sdk::Client;
    ///
    /// let client = Client::new("http://localhost:8080/");
    /// assert_eq!(client.base_url(), "http://localhost:8080");
    /// ```
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::builder(base_url).build()
    }

    /// Returns a builder for configuring the client.
    pub fn builder(base_url: impl Into<String>) -> ClientBuilder {
        ClientBuilder {
            base_url: base_url.into(),
            timeout: Some(DEFAULT_TIMEOUT),
            user_agent: None,
        }
    }

    /// Returns the base URL of the explorer API, without trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the underlying HTTP client (for internal API modules).
    pub(crate) fn http(&self) -> &ReqwestClient {
        &self.http
    }
}

/// Fails with [`Error::RemoteApi`] on a non-2xx status.
///
/// The body is read best-effort; when reading it fails the status code is
/// used as the body text.
pub(crate) async fn ensure_success(response: Response) -> Result<Response, Error> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| status.as_u16().to_string());
    Err(Error::RemoteApi {
        status: status.as_u16(),
        body,
    })
}
