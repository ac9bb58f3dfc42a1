//! Catalog provider port (driven/secondary port)
//!
//! This module defines the interface for fetching product listings from an
//! external provider. The primary implementation targets a DummyJSON-style
//! paginated REST API, but the trait is provider-agnostic; which
//! implementation runs is decided by configuration at startup.
//!
//! ## Design Notes
//!
//! - `fetch_page` returns a typed [`ProviderError`] rather than `anyhow`
//!   because the orchestration layer branches on it: any provider error
//!   aborts the current run, and the carried cursor says how far the run got.
//! - The adapter does not retry internally. The next scheduled tick or a
//!   manual trigger is the retry mechanism.
//! - The page sequence is finite and restartable: fetching with `None`
//!   starts over from the first page.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::record::ExternalRecord;

// ============================================================================
// PageCursor
// ============================================================================

/// Position within a provider's paginated listing
///
/// Encodes the record offset of the next page. `None` in
/// [`ICatalogProvider::fetch_page`] means "start from the beginning".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageCursor(u64);

impl PageCursor {
    /// Creates a cursor at the given record offset
    #[must_use]
    pub const fn new(offset: u64) -> Self {
        Self(offset)
    }

    /// Returns the record offset this cursor points at
    #[must_use]
    pub const fn offset(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for PageCursor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// ProviderPage
// ============================================================================

/// One page of normalized records from the provider
///
/// `next_cursor` is `None` on the last page; records preserve provider
/// order within the page.
#[derive(Debug, Clone)]
pub struct ProviderPage {
    /// Normalized records in provider order
    pub records: Vec<ExternalRecord>,
    /// Cursor for the next page, absent when the listing is exhausted
    pub next_cursor: Option<PageCursor>,
}

// ============================================================================
// ProviderError
// ============================================================================

/// Failure while fetching or decoding a provider page
///
/// Every variant carries the offset of the page that failed so the
/// orchestrator can report how far a run progressed before aborting.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The HTTP request failed or returned a non-success status
    #[error("provider request failed at offset {offset}: {message}")]
    Http {
        /// Record offset of the failing page
        offset: u64,
        /// Underlying transport or status error
        message: String,
    },

    /// The response body could not be decoded into the expected shape
    #[error("provider response could not be decoded at offset {offset}: {message}")]
    Decode {
        /// Record offset of the failing page
        offset: u64,
        /// Underlying decode error
        message: String,
    },

    /// The page fetch did not complete within the configured deadline
    #[error("provider request timed out at offset {offset} after {timeout_secs}s")]
    Timeout {
        /// Record offset of the failing page
        offset: u64,
        /// Deadline that was exceeded
        timeout_secs: u64,
    },
}

impl ProviderError {
    /// Returns the record offset of the page that failed
    pub fn offset(&self) -> u64 {
        match self {
            ProviderError::Http { offset, .. }
            | ProviderError::Decode { offset, .. }
            | ProviderError::Timeout { offset, .. } => *offset,
        }
    }
}

// ============================================================================
// ICatalogProvider trait
// ============================================================================

/// Port trait for external product listing providers
///
/// Implementations handle the provider-specific API calls, pagination
/// scheme, and field mapping into [`ExternalRecord`]. Records the provider
/// cannot normalize (missing required fields, negative price) are dropped
/// with a warning rather than failing the page; transport and decode
/// failures fail the page with a [`ProviderError`].
#[async_trait::async_trait]
pub trait ICatalogProvider: Send + Sync {
    /// Short provider name for logs and status output (e.g. "dummyjson")
    fn name(&self) -> &str;

    /// Fetches one page of the listing
    ///
    /// # Arguments
    /// * `cursor` - Position from a previous page's `next_cursor`, or
    ///   `None` to start from the beginning
    ///
    /// # Returns
    /// The page's normalized records and, unless this was the last page,
    /// the cursor for the next one
    async fn fetch_page(&self, cursor: Option<&PageCursor>)
        -> Result<ProviderPage, ProviderError>;
}
