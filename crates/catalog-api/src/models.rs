//! Request and response bodies for the HTTP API

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use catalog_core::domain::newtypes::RunId;
use catalog_core::domain::product::Product;
use catalog_core::domain::sync_run::{RunError, SyncRun};
use catalog_core::domain::user::{Role, User};
use catalog_sync::SyncStatus;

// ============================================================================
// Auth
// ============================================================================

/// Body of `POST /auth/register`
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    /// Defaults to `user` when omitted
    #[serde(default)]
    pub role: Option<Role>,
}

/// Body of `POST /auth/login`
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Body of `PUT /auth/users/:id/role`
#[derive(Debug, Deserialize)]
pub struct RoleUpdateRequest {
    pub role: Role,
}

/// Issued access token
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

impl TokenResponse {
    /// Wraps a bearer token in the standard response shape
    pub fn bearer(access_token: String) -> Self {
        Self {
            access_token,
            token_type: "bearer".to_string(),
        }
    }
}

/// Public view of an account
#[derive(Debug, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id().to_string(),
            email: user.email().as_str().to_string(),
            role: user.role(),
            created_at: user.created_at(),
        }
    }
}

// ============================================================================
// Products
// ============================================================================

/// Body of `POST /products`
#[derive(Debug, Deserialize)]
pub struct ProductCreateRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: f64,
    #[serde(default)]
    pub category: Option<String>,
}

/// Body of `PUT /products/:id`
///
/// Omitted fields are left unchanged.
#[derive(Debug, Default, Deserialize)]
pub struct ProductUpdateRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub category: Option<String>,
}

/// Public view of a product
#[derive(Debug, Serialize, Deserialize)]
pub struct ProductResponse {
    pub id: String,
    pub external_id: Option<String>,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub category: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Product> for ProductResponse {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id().to_string(),
            external_id: product.external_id().map(|e| e.as_str().to_string()),
            name: product.name().to_string(),
            description: product.description().map(str::to_string),
            price: product.price(),
            category: product.category().map(str::to_string),
            created_at: product.created_at(),
            updated_at: product.updated_at(),
        }
    }
}

/// Query parameters of `GET /products`
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub page_size: Option<u32>,
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub min_price: Option<f64>,
    #[serde(default)]
    pub max_price: Option<f64>,
}

/// Paginated product listing
#[derive(Debug, Serialize, Deserialize)]
pub struct ProductListResponse {
    pub products: Vec<ProductResponse>,
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
    pub total_pages: u64,
}

// ============================================================================
// Sync
// ============================================================================

/// Body of `202 Accepted` and `409 Conflict` trigger responses
#[derive(Debug, Serialize, Deserialize)]
pub struct TriggerResponse {
    pub run_id: RunId,
}

/// Public view of one reconciliation run
#[derive(Debug, Serialize, Deserialize)]
pub struct RunResponse {
    pub run_id: RunId,
    pub status: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub records_fetched: u64,
    pub records_created: u64,
    pub records_updated: u64,
    pub records_failed: u64,
    pub errors: Vec<RunError>,
}

impl From<&SyncRun> for RunResponse {
    fn from(run: &SyncRun) -> Self {
        Self {
            run_id: run.run_id(),
            status: run.status().to_string(),
            started_at: run.started_at(),
            finished_at: run.finished_at(),
            records_fetched: run.records_fetched(),
            records_created: run.records_created(),
            records_updated: run.records_updated(),
            records_failed: run.records_failed(),
            errors: run.errors().to_vec(),
        }
    }
}

/// Body of `GET /sync/status`
#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    pub current: Option<RunResponse>,
    pub last_completed: Option<RunResponse>,
}

impl From<&SyncStatus> for StatusResponse {
    fn from(status: &SyncStatus) -> Self {
        Self {
            current: status.current.as_deref().map(RunResponse::from),
            last_completed: status.last_completed.as_deref().map(RunResponse::from),
        }
    }
}
