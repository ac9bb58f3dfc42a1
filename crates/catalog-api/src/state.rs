//! Shared application state for the API

use std::sync::Arc;

use catalog_core::ports::repositories::{IProductRepository, IUserRepository};
use catalog_sync::{StatusBoard, SyncOrchestrator};

use crate::auth::TokenKeys;

/// Pagination bounds applied to list endpoints
#[derive(Debug, Clone, Copy)]
pub struct PageLimits {
    /// Page size when the request does not specify one
    pub default_size: u32,
    /// Upper bound a requested page size is clamped to
    pub max_size: u32,
}

impl Default for PageLimits {
    fn default() -> Self {
        Self {
            default_size: 20,
            max_size: 100,
        }
    }
}

/// State shared by every handler
#[derive(Clone)]
pub struct AppState {
    /// Account storage
    pub users: Arc<dyn IUserRepository>,
    /// Product storage
    pub products: Arc<dyn IProductRepository>,
    /// JWT issue/verify keys
    pub keys: Arc<TokenKeys>,
    /// Reconciliation trigger entry point
    pub orchestrator: Arc<SyncOrchestrator>,
    /// Run status snapshots
    pub board: Arc<StatusBoard>,
    /// List pagination bounds
    pub pages: PageLimits,
}
