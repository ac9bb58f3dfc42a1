//! DummyJSON implementation of the ICatalogProvider port
//!
//! Fetches one page per call and leaves retry decisions to the caller:
//! a failed page surfaces as a `ProviderError` carrying the offset, and the
//! orchestration layer decides whether the run aborts.

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use catalog_core::config::ProviderConfig;
use catalog_core::ports::catalog_provider::{
    ICatalogProvider, PageCursor, ProviderError, ProviderPage,
};

use crate::client::CatalogClient;
use crate::dummyjson::{DummyJsonPage, RecordParser};

/// Provider adapter for DummyJSON-style product APIs
pub struct DummyJsonProvider {
    client: CatalogClient,
    page_size: u32,
}

impl DummyJsonProvider {
    /// Creates a provider over the given client
    ///
    /// # Arguments
    /// * `client` - HTTP client pointed at the listing endpoint
    /// * `page_size` - Records requested per page
    pub fn new(client: CatalogClient, page_size: u32) -> Self {
        Self { client, page_size }
    }
}

#[async_trait::async_trait]
impl ICatalogProvider for DummyJsonProvider {
    fn name(&self) -> &str {
        "dummyjson"
    }

    async fn fetch_page(
        &self,
        cursor: Option<&PageCursor>,
    ) -> Result<ProviderPage, ProviderError> {
        let offset = cursor.map(PageCursor::offset).unwrap_or(0);

        debug!(offset, page_size = self.page_size, "Fetching provider page");

        let response = self
            .client
            .page_request(self.page_size, offset)
            .send()
            .await
            .map_err(|e| ProviderError::Http {
                offset,
                message: e.to_string(),
            })?
            .error_for_status()
            .map_err(|e| ProviderError::Http {
                offset,
                message: e.to_string(),
            })?;

        let raw: DummyJsonPage = response.json().await.map_err(|e| ProviderError::Decode {
            offset,
            message: e.to_string(),
        })?;

        let page = RecordParser::parse_page(raw);

        debug!(
            offset,
            records = page.records.len(),
            has_next = page.next_cursor.is_some(),
            "Fetched provider page"
        );

        Ok(page)
    }
}

/// Builds the configured provider
///
/// Provider selection happens once at startup; callers hold the result as
/// `Arc<dyn ICatalogProvider>` and never re-dispatch at runtime.
///
/// # Errors
///
/// Fails on an unknown `provider.kind`.
pub fn provider_from_config(
    config: &ProviderConfig,
) -> anyhow::Result<Arc<dyn ICatalogProvider>> {
    match config.kind.as_str() {
        "dummyjson" => {
            let client = CatalogClient::new(
                &config.base_url,
                Duration::from_secs(config.request_timeout_secs),
            );
            Ok(Arc::new(DummyJsonProvider::new(client, config.page_size)))
        }
        other => anyhow::bail!("unknown provider kind '{other}' (available: dummyjson)"),
    }
}
