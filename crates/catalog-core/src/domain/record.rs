//! External record value type
//!
//! An [`ExternalRecord`] is the normalized shape of one item from an external
//! product listing. It is a port-level DTO: the provider adapter produces it,
//! the reconciler consumes it, and it is never persisted directly. The
//! adapter is responsible for field mapping; anything provider-specific that
//! survives normalization lives in `raw_payload`.

use serde::{Deserialize, Serialize};

use super::newtypes::ExternalId;

/// One normalized item from an external product listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExternalRecord {
    /// Identifier assigned by the provider, unique within that provider
    pub external_id: ExternalId,
    /// Product name
    pub name: String,
    /// Free-text description, if the provider supplies one
    pub description: Option<String>,
    /// Unit price; adapters must not emit negative values
    pub price: f64,
    /// Provider-assigned category, if any
    pub category: Option<String>,
    /// The raw provider payload this record was normalized from
    pub raw_payload: serde_json::Value,
}
