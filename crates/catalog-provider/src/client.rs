//! HTTP client for external product listings
//!
//! Wraps `reqwest::Client` with the provider's base URL and a per-request
//! timeout. The timeout is set on the client itself so every request path
//! inherits it; a provider that stops responding turns into an error instead
//! of an indefinitely suspended fetch.

use std::time::Duration;

use reqwest::{Client, RequestBuilder};

/// Default per-request timeout when none is configured
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP client for a paginated product listing endpoint
pub struct CatalogClient {
    /// The underlying HTTP client
    client: Client,
    /// Full URL of the listing endpoint
    base_url: String,
}

impl CatalogClient {
    /// Creates a new client for the given listing URL
    ///
    /// # Arguments
    /// * `base_url` - Full URL of the product listing endpoint
    /// * `timeout` - Per-request timeout
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| Client::new());
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    /// Creates a client with the default timeout (useful for tests)
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self::new(base_url, DEFAULT_TIMEOUT)
    }

    /// Returns the configured listing URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Builds a GET request for one page of the listing
    ///
    /// # Arguments
    /// * `limit` - Records per page
    /// * `skip` - Record offset of the page
    pub fn page_request(&self, limit: u32, skip: u64) -> RequestBuilder {
        self.client
            .get(&self.base_url)
            .query(&[("limit", limit.to_string()), ("skip", skip.to_string())])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = CatalogClient::with_base_url("http://localhost:9999/products");
        assert_eq!(client.base_url(), "http://localhost:9999/products");
    }

    #[test]
    fn test_page_request_carries_pagination_params() {
        let client = CatalogClient::with_base_url("http://localhost:9999/products");
        let request = client.page_request(30, 60).build().unwrap();
        let url = request.url().as_str();
        assert!(url.starts_with("http://localhost:9999/products?"));
        assert!(url.contains("limit=30"));
        assert!(url.contains("skip=60"));
    }
}
