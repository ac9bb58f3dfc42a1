//! Product CRUD endpoints
//!
//! Reads require any authenticated user; mutations require admin. Manual
//! deletion here is the only way a product leaves the catalog; the
//! reconciliation job never deletes.

use std::str::FromStr;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;

use catalog_core::domain::newtypes::ProductId;
use catalog_core::domain::product::Product;
use catalog_core::ports::repositories::ProductFilter;

use crate::auth::{AdminUser, AuthUser};
use crate::error::ApiError;
use crate::models::{
    ListQuery, ProductCreateRequest, ProductListResponse, ProductResponse, ProductUpdateRequest,
};
use crate::state::AppState;

fn parse_product_id(id: &str) -> Result<ProductId, ApiError> {
    ProductId::from_str(id).map_err(|_| ApiError::BadRequest(format!("invalid product id: {id}")))
}

fn filter_from_query(query: &ListQuery) -> ProductFilter {
    ProductFilter {
        search: query.search.clone(),
        category: query.category.clone(),
        min_price: query.min_price,
        max_price: query.max_price,
    }
}

/// `POST /products` - create a product (admin only)
pub async fn create_product(
    State(state): State<AppState>,
    AdminUser(_claims): AdminUser,
    Json(body): Json<ProductCreateRequest>,
) -> Result<(StatusCode, Json<ProductResponse>), ApiError> {
    let product = Product::new_manual(body.name, body.description, body.price, body.category)?;
    state.products.insert(&product).await?;

    tracing::info!(product_id = %product.id(), "Created product");

    Ok((StatusCode::CREATED, Json(ProductResponse::from(&product))))
}

/// `GET /products` - paginated listing with filters
pub async fn list_products(
    State(state): State<AppState>,
    AuthUser(_claims): AuthUser,
    Query(query): Query<ListQuery>,
) -> Result<Json<ProductListResponse>, ApiError> {
    let page = query.page.unwrap_or(1).max(1);
    let page_size = query
        .page_size
        .unwrap_or(state.pages.default_size)
        .clamp(1, state.pages.max_size);

    let filter = filter_from_query(&query);
    let offset = (page - 1).saturating_mul(page_size);

    let total = state.products.count(&filter).await?;
    let products = state.products.list(&filter, page_size, offset).await?;

    let total_pages = if total == 0 {
        0
    } else {
        (total + page_size as u64 - 1) / page_size as u64
    };

    Ok(Json(ProductListResponse {
        products: products.iter().map(ProductResponse::from).collect(),
        total,
        page,
        page_size,
        total_pages,
    }))
}

/// `GET /products/:id` - fetch one product
pub async fn get_product(
    State(state): State<AppState>,
    AuthUser(_claims): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ProductResponse>, ApiError> {
    let product_id = parse_product_id(&id)?;

    let product = state
        .products
        .get(&product_id)
        .await?
        .ok_or(ApiError::NotFound("product"))?;

    Ok(Json(ProductResponse::from(&product)))
}

/// `PUT /products/:id` - partial update (admin only)
///
/// Only fields present in the body are applied.
pub async fn update_product(
    State(state): State<AppState>,
    AdminUser(_claims): AdminUser,
    Path(id): Path<String>,
    Json(body): Json<ProductUpdateRequest>,
) -> Result<Json<ProductResponse>, ApiError> {
    let product_id = parse_product_id(&id)?;

    let mut product = state
        .products
        .get(&product_id)
        .await?
        .ok_or(ApiError::NotFound("product"))?;

    if let Some(name) = body.name {
        product.set_name(name)?;
    }
    if let Some(description) = body.description {
        product.set_description(Some(description));
    }
    if let Some(price) = body.price {
        product.set_price(price)?;
    }
    if let Some(category) = body.category {
        product.set_category(Some(category));
    }

    state.products.update(&product).await?;

    tracing::info!(product_id = %product_id, "Updated product");

    Ok(Json(ProductResponse::from(&product)))
}

/// `DELETE /products/:id` - remove a product (admin only)
pub async fn delete_product(
    State(state): State<AppState>,
    AdminUser(_claims): AdminUser,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let product_id = parse_product_id(&id)?;

    if !state.products.delete(&product_id).await? {
        return Err(ApiError::NotFound("product"));
    }

    tracing::info!(product_id = %product_id, "Deleted product");

    Ok(StatusCode::NO_CONTENT)
}
