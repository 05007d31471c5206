//! ClientBuilder for configuring the Praxis HTTP client.

use crate::Error;
use reqwest::Client as ReqwestClient;
use std::time::Duration;

use super::Client;

/// Builder for configuring the Praxis client.
#[derive(Debug)]
pub struct ClientBuilder {
    pub(super) base_url: String,
    pub(super) timeout: Option<Duration>,
    pub(super) user_agent: Option<String>,
}

impl ClientBuilder {
    /// Sets the overall request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Removes the overall request timeout.
    pub fn no_timeout(mut self) -> Self {
        self.timeout = None;
        self
    }

    /// Sets the `User-Agent` header sent with every request.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Builds the client. Panics if reqwest client build fails.
    /// Prefer [`try_build`](Self::try_build) when you need to handle errors.
    pub fn build(self) -> Client {
        self.try_build().expect("reqwest client build")
    }

    /// Builds the client, returning an error if reqwest client build fails.
    pub fn try_build(self) -> Result<Client, Error> {
        let mut builder = ReqwestClient::builder();
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(ua) = self.user_agent {
            builder = builder.user_agent(ua);
        }
        let http = builder
            .build()
            .map_err(|e| Error::ClientBuildFailed(e.to_string()))?;
        Ok(Client {
            base_url: self.base_url.trim_end_matches('/').to_string(),
            http,
        })
    }
}
