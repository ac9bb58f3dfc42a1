//! SQLite implementation of IProductRepository
//!
//! ## Type Mapping
//!
//! | Domain Type    | SQL Type | Strategy                                    |
//! |----------------|----------|---------------------------------------------|
//! | ProductId      | TEXT     | UUID string via `.to_string()` / `FromStr`  |
//! | ExternalId     | TEXT     | String via `.as_str()` / `ExternalId::new()`|
//! | price          | REAL     | f64                                         |
//! | DateTime<Utc>  | TEXT     | ISO 8601 via `to_rfc3339()`                 |
//!
//! `insert` deliberately uses plain INSERT so the UNIQUE constraint on
//! `external_id` surfaces as an error instead of silently replacing a row;
//! the reconciler depends on that to report duplicate collisions per record.

use std::str::FromStr;

use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use catalog_core::domain::newtypes::{ExternalId, ProductId};
use catalog_core::domain::product::Product;
use catalog_core::ports::repositories::{IProductRepository, ProductFilter};

use crate::util::{parse_datetime, parse_optional_string};
use crate::StoreError;

/// SQLite-based implementation of the product repository port
pub struct SqliteProductRepository {
    pool: SqlitePool,
}

impl SqliteProductRepository {
    /// Creates a new repository instance with the given connection pool
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

/// Reconstruct a Product from a database row
fn product_from_row(row: &SqliteRow) -> Result<Product, StoreError> {
    let id_str: String = row.get("id");
    let external_id_str: Option<String> = row.get("external_id");
    let name: String = row.get("name");
    let description: Option<String> = row.get("description");
    let price: f64 = row.get("price");
    let category: Option<String> = row.get("category");
    let created_at_str: String = row.get("created_at");
    let updated_at_str: String = row.get("updated_at");

    let id = ProductId::from_str(&id_str).map_err(|e| {
        StoreError::SerializationError(format!("Invalid ProductId '{}': {}", id_str, e))
    })?;

    let external_id = match parse_optional_string(external_id_str) {
        Some(raw) => Some(ExternalId::new(raw.clone()).map_err(|e| {
            StoreError::SerializationError(format!("Invalid ExternalId '{}': {}", raw, e))
        })?),
        None => None,
    };

    let created_at = parse_datetime(&created_at_str)?;
    let updated_at = parse_datetime(&updated_at_str)?;

    Ok(Product::from_parts(
        id,
        external_id,
        name,
        description,
        price,
        category,
        created_at,
        updated_at,
    ))
}

/// Append the WHERE clauses for a filter to `sql`
///
/// Bind order must match [`bind_filter`].
fn push_filter_sql(sql: &mut String, filter: &ProductFilter) {
    if filter.search.is_some() {
        sql.push_str(" AND (name LIKE ? OR description LIKE ?)");
    }
    if filter.category.is_some() {
        sql.push_str(" AND category LIKE ?");
    }
    if filter.min_price.is_some() {
        sql.push_str(" AND price >= ?");
    }
    if filter.max_price.is_some() {
        sql.push_str(" AND price <= ?");
    }
}

/// Bind the filter values in the order [`push_filter_sql`] emitted them
fn bind_filter<'q>(
    mut query: sqlx::query::Query<'q, sqlx::Sqlite, sqlx::sqlite::SqliteArguments<'q>>,
    filter: &ProductFilter,
) -> sqlx::query::Query<'q, sqlx::Sqlite, sqlx::sqlite::SqliteArguments<'q>> {
    if let Some(ref search) = filter.search {
        let pattern = format!("%{search}%");
        query = query.bind(pattern.clone());
        query = query.bind(pattern);
    }
    if let Some(ref category) = filter.category {
        query = query.bind(format!("%{category}%"));
    }
    if let Some(min_price) = filter.min_price {
        query = query.bind(min_price);
    }
    if let Some(max_price) = filter.max_price {
        query = query.bind(max_price);
    }
    query
}

#[async_trait::async_trait]
impl IProductRepository for SqliteProductRepository {
    async fn insert(&self, product: &Product) -> anyhow::Result<()> {
        let id = product.id().to_string();
        let external_id = product.external_id().map(|e| e.as_str().to_string());
        let created_at = product.created_at().to_rfc3339();
        let updated_at = product.updated_at().to_rfc3339();

        sqlx::query(
            "INSERT INTO products \
             (id, external_id, name, description, price, category, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(&external_id)
        .bind(product.name())
        .bind(product.description())
        .bind(product.price())
        .bind(product.category())
        .bind(&created_at)
        .bind(&updated_at)
        .execute(&self.pool)
        .await?;

        tracing::trace!(product_id = %id, "Inserted product");
        Ok(())
    }

    async fn get(&self, id: &ProductId) -> anyhow::Result<Option<Product>> {
        let id_str = id.to_string();

        let row = sqlx::query("SELECT * FROM products WHERE id = ?")
            .bind(&id_str)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(ref r) => Ok(Some(product_from_row(r)?)),
            None => Ok(None),
        }
    }

    async fn get_by_external_id(
        &self,
        external_id: &ExternalId,
    ) -> anyhow::Result<Option<Product>> {
        let row = sqlx::query("SELECT * FROM products WHERE external_id = ?")
            .bind(external_id.as_str())
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(ref r) => Ok(Some(product_from_row(r)?)),
            None => Ok(None),
        }
    }

    async fn update(&self, product: &Product) -> anyhow::Result<()> {
        let id = product.id().to_string();
        let external_id = product.external_id().map(|e| e.as_str().to_string());
        let updated_at = product.updated_at().to_rfc3339();

        let result = sqlx::query(
            "UPDATE products SET \
             external_id = ?, name = ?, description = ?, price = ?, \
             category = ?, updated_at = ? \
             WHERE id = ?",
        )
        .bind(&external_id)
        .bind(product.name())
        .bind(product.description())
        .bind(product.price())
        .bind(product.category())
        .bind(&updated_at)
        .bind(&id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            anyhow::bail!("No product with id {id} to update");
        }

        tracing::trace!(product_id = %id, "Updated product");
        Ok(())
    }

    async fn delete(&self, id: &ProductId) -> anyhow::Result<bool> {
        let id_str = id.to_string();

        let result = sqlx::query("DELETE FROM products WHERE id = ?")
            .bind(&id_str)
            .execute(&self.pool)
            .await?;

        let deleted = result.rows_affected() > 0;
        if deleted {
            tracing::trace!(product_id = %id_str, "Deleted product");
        }
        Ok(deleted)
    }

    async fn list(
        &self,
        filter: &ProductFilter,
        limit: u32,
        offset: u32,
    ) -> anyhow::Result<Vec<Product>> {
        let mut sql = String::from("SELECT * FROM products WHERE 1=1");
        push_filter_sql(&mut sql, filter);
        sql.push_str(" ORDER BY created_at DESC, id LIMIT ? OFFSET ?");

        let query = bind_filter(sqlx::query(&sql), filter)
            .bind(limit as i64)
            .bind(offset as i64);

        let rows = query.fetch_all(&self.pool).await?;

        let mut products = Vec::with_capacity(rows.len());
        for row in &rows {
            products.push(product_from_row(row)?);
        }

        Ok(products)
    }

    async fn count(&self, filter: &ProductFilter) -> anyhow::Result<u64> {
        let mut sql = String::from("SELECT COUNT(*) as count FROM products WHERE 1=1");
        push_filter_sql(&mut sql, filter);

        let row = bind_filter(sqlx::query(&sql), filter)
            .fetch_one(&self.pool)
            .await?;

        let count: i64 = row.get("count");
        Ok(count as u64)
    }
}
