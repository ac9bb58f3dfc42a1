//! Catalog API - HTTP surface
//!
//! Axum-based JSON API exposing:
//! - `POST /auth/register`, `POST /auth/login`, `GET /auth/me`,
//!   `PUT /auth/users/:id/role` - account management
//! - `GET/POST /products`, `GET/PUT/DELETE /products/:id` - catalog CRUD
//! - `POST /sync/trigger`, `GET /sync/status` - reconciliation control
//!
//! Authentication is a bearer JWT (HS256) carrying the user's id, email,
//! and role. Mutating catalog routes and the sync routes require the
//! `admin` role; reads require any authenticated user.

pub mod auth;
pub mod error;
pub mod handlers;
pub mod models;
pub mod state;

use axum::routing::{get, post, put};
use axum::Router;

pub use error::ApiError;
pub use state::AppState;

/// Builds the API router with all routes attached
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/auth/register", post(handlers::auth::register))
        .route("/auth/login", post(handlers::auth::login))
        .route("/auth/me", get(handlers::auth::me))
        .route("/auth/users/:id/role", put(handlers::auth::update_role))
        .route(
            "/products",
            get(handlers::products::list_products).post(handlers::products::create_product),
        )
        .route(
            "/products/:id",
            get(handlers::products::get_product)
                .put(handlers::products::update_product)
                .delete(handlers::products::delete_product),
        )
        .route("/sync/trigger", post(handlers::sync::trigger_sync))
        .route("/sync/status", get(handlers::sync::sync_status))
        .with_state(state)
}
