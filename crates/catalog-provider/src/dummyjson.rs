//! DummyJSON wire types and record normalization
//!
//! Maps the DummyJSON products API response into port-level types.
//!
//! ## Pagination
//!
//! The API paginates with `limit`/`skip` query parameters and reports the
//! collection size in `total`:
//!
//! `GET /products?limit=30&skip=60` returns
//! `{"products": [...], "total": 194, "skip": 60, "limit": 30}`
//!
//! The next cursor is `skip + returned count` while that stays below
//! `total`; the last page has no next cursor.
//!
//! ## Normalization
//!
//! Each element of `products` is deserialized individually, so one
//! malformed item is dropped with a warning instead of failing the page.
//! Items with a missing id/title or a negative price are skipped the same
//! way. Fields this service does not model stay available in the record's
//! `raw_payload`.

use serde::Deserialize;
use tracing::warn;

use catalog_core::domain::newtypes::ExternalId;
use catalog_core::domain::record::ExternalRecord;
use catalog_core::ports::catalog_provider::{PageCursor, ProviderPage};

// ============================================================================
// DummyJSON API response types (JSON deserialization)
// ============================================================================

/// Raw response from the DummyJSON products endpoint
///
/// `products` is kept as raw JSON values so each item can be decoded
/// independently of its page-mates.
#[derive(Debug, Deserialize)]
pub(crate) struct DummyJsonPage {
    /// Array of raw product objects
    #[serde(default)]
    pub(crate) products: Vec<serde_json::Value>,

    /// Total number of products in the collection
    #[serde(default)]
    pub(crate) total: u64,

    /// Record offset of this page
    #[serde(default)]
    pub(crate) skip: u64,
}

/// A single product from the DummyJSON API
///
/// Only the fields this service models are listed; everything else is
/// ignored by serde and preserved in the raw payload.
#[derive(Debug, Deserialize)]
struct DummyJsonProduct {
    /// Numeric identifier within the provider
    id: i64,

    /// Product title
    title: String,

    /// Unit price
    price: f64,

    /// Free-text description
    #[serde(default)]
    description: Option<String>,

    /// Category label
    #[serde(default)]
    category: Option<String>,
}

// ============================================================================
// RecordParser - converts DummyJSON responses to port-level types
// ============================================================================

/// Parser for converting DummyJSON responses into port-level types
pub(crate) struct RecordParser;

impl RecordParser {
    /// Parse a single raw product into an [`ExternalRecord`]
    ///
    /// Returns `None` (with a warning) when the item cannot be normalized:
    /// undecodable shape, blank title, or a price that is negative or not
    /// finite. The page itself is unaffected.
    pub(crate) fn parse_item(raw: &serde_json::Value) -> Option<ExternalRecord> {
        let product: DummyJsonProduct = match serde_json::from_value(raw.clone()) {
            Ok(product) => product,
            Err(e) => {
                warn!(error = %e, "Dropping undecodable provider record");
                return None;
            }
        };

        let external_id = match ExternalId::new(product.id.to_string()) {
            Ok(id) => id,
            Err(e) => {
                warn!(error = %e, "Dropping provider record with unusable id");
                return None;
            }
        };

        if product.title.trim().is_empty() {
            warn!(external_id = %external_id, "Dropping provider record with blank title");
            return None;
        }

        if !product.price.is_finite() || product.price < 0.0 {
            warn!(
                external_id = %external_id,
                price = product.price,
                "Dropping provider record with invalid price"
            );
            return None;
        }

        Some(ExternalRecord {
            external_id,
            name: product.title,
            description: product.description,
            price: product.price,
            category: product.category,
            raw_payload: raw.clone(),
        })
    }

    /// Parse a complete page response into a port-level [`ProviderPage`]
    ///
    /// Normalizes every decodable item and computes the next cursor from
    /// the pagination metadata. The cursor advances by the number of raw
    /// items the provider returned, including ones normalization dropped,
    /// so no provider offset is fetched twice.
    pub(crate) fn parse_page(page: DummyJsonPage) -> ProviderPage {
        let raw_count = page.products.len() as u64;

        let records: Vec<ExternalRecord> = page
            .products
            .iter()
            .filter_map(RecordParser::parse_item)
            .collect();

        let consumed = page.skip + raw_count;
        let next_cursor = if raw_count > 0 && consumed < page.total {
            Some(PageCursor::new(consumed))
        } else {
            None
        };

        ProviderPage {
            records,
            next_cursor,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
