//! Shared HTTP request helpers for the Praxis SDK.
//!
//! Provides `RequestBuilderExt::json_content` so API modules attach the
//! content type the explorer API expects without repeating the header.

use reqwest::header::CONTENT_TYPE;
use reqwest::RequestBuilder;

/// Extension trait for `reqwest::RequestBuilder` used by the directory API modules.
pub(crate) trait RequestBuilderExt {
    /// Sets `Content-Type: application/json`.
    fn json_content(self) -> Self;
}

impl RequestBuilderExt for RequestBuilder {
    fn json_content(self) -> Self {
        self.header(CONTENT_TYPE, "application/json")
    }
}
