//! Repository ports (driven/secondary ports)
//!
//! This module defines the interfaces for persisting and querying products,
//! users, and the last reconciliation run.
//!
//! ## Design Notes
//!
//! - Uses `anyhow::Result` because storage errors are adapter-specific
//!   (SQLite, in-memory, etc.) and don't need domain-level classification.
//!   The reconciler treats any write error as a per-record failure and
//!   records its display form.
//! - The `ProductFilter` struct provides a composable query mechanism
//!   without exposing storage implementation details.
//! - Each write method is a single logical statement. Callers that need a
//!   page of records to survive one bad write rely on exactly that: there
//!   is no batch transaction around reconciliation writes.

use crate::domain::newtypes::{Email, ExternalId, ProductId, UserId};
use crate::domain::product::Product;
use crate::domain::sync_run::SyncRun;
use crate::domain::user::{Role, User};

// ============================================================================
// ProductFilter
// ============================================================================

/// Filter criteria for listing products
///
/// All fields are optional; when `None`, no filtering is applied for that
/// field. Multiple filters are combined with AND logic.
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    /// Substring match against name or description
    pub search: Option<String>,
    /// Substring match against the category label
    pub category: Option<String>,
    /// Lower price bound (inclusive)
    pub min_price: Option<f64>,
    /// Upper price bound (inclusive)
    pub max_price: Option<f64>,
}

impl ProductFilter {
    /// Creates an empty filter (matches all products)
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the search filter
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    /// Sets the category filter
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Sets the minimum price filter
    pub fn with_min_price(mut self, min_price: f64) -> Self {
        self.min_price = Some(min_price);
        self
    }

    /// Sets the maximum price filter
    pub fn with_max_price(mut self, max_price: f64) -> Self {
        self.max_price = Some(max_price);
        self
    }

    /// Returns true if no filters are set
    pub fn is_empty(&self) -> bool {
        self.search.is_none()
            && self.category.is_none()
            && self.min_price.is_none()
            && self.max_price.is_none()
    }
}

// ============================================================================
// IProductRepository trait
// ============================================================================

/// Port trait for product persistence
///
/// ## Implementation Notes
///
/// - `insert` must enforce uniqueness of `external_id` among non-null
///   values and fail (not overwrite) on a collision.
/// - `list` and `count` share filter semantics so pagination metadata
///   stays consistent with page contents.
#[async_trait::async_trait]
pub trait IProductRepository: Send + Sync {
    /// Inserts a new product
    async fn insert(&self, product: &Product) -> anyhow::Result<()>;

    /// Retrieves a product by its local id
    async fn get(&self, id: &ProductId) -> anyhow::Result<Option<Product>>;

    /// Retrieves a product by its provider identifier
    async fn get_by_external_id(
        &self,
        external_id: &ExternalId,
    ) -> anyhow::Result<Option<Product>>;

    /// Overwrites an existing product row
    async fn update(&self, product: &Product) -> anyhow::Result<()>;

    /// Deletes a product; returns false when no such row existed
    async fn delete(&self, id: &ProductId) -> anyhow::Result<bool>;

    /// Lists products matching the filter, newest first
    async fn list(
        &self,
        filter: &ProductFilter,
        limit: u32,
        offset: u32,
    ) -> anyhow::Result<Vec<Product>>;

    /// Counts products matching the filter
    async fn count(&self, filter: &ProductFilter) -> anyhow::Result<u64>;
}

// ============================================================================
// IUserRepository trait
// ============================================================================

/// Port trait for account persistence
#[async_trait::async_trait]
pub trait IUserRepository: Send + Sync {
    /// Inserts a new account; fails on a duplicate email
    async fn insert(&self, user: &User) -> anyhow::Result<()>;

    /// Retrieves an account by id
    async fn get(&self, id: &UserId) -> anyhow::Result<Option<User>>;

    /// Retrieves an account by login email
    async fn get_by_email(&self, email: &Email) -> anyhow::Result<Option<User>>;

    /// Changes an account's role; returns false when no such account exists
    async fn update_role(&self, id: &UserId, role: Role) -> anyhow::Result<bool>;
}

// ============================================================================
// IRunRepository trait
// ============================================================================

/// Port trait for the single-slot run history
///
/// Only the most recent completed run is retained; saving a run replaces
/// whatever was stored before.
#[async_trait::async_trait]
pub trait IRunRepository: Send + Sync {
    /// Stores `run` as the last completed run, replacing any previous one
    async fn save_last(&self, run: &SyncRun) -> anyhow::Result<()>;

    /// Loads the last completed run, if any
    async fn load_last(&self) -> anyhow::Result<Option<SyncRun>>;
}
