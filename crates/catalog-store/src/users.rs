//! SQLite implementation of IUserRepository

use std::str::FromStr;

use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use catalog_core::domain::newtypes::{Email, UserId};
use catalog_core::domain::user::{Role, User};
use catalog_core::ports::repositories::IUserRepository;

use crate::util::parse_datetime;
use crate::StoreError;

/// SQLite-based implementation of the user repository port
pub struct SqliteUserRepository {
    pool: SqlitePool,
}

impl SqliteUserRepository {
    /// Creates a new repository instance with the given connection pool
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

/// Reconstruct a User from a database row
fn user_from_row(row: &SqliteRow) -> Result<User, StoreError> {
    let id_str: String = row.get("id");
    let email_str: String = row.get("email");
    let password_hash: String = row.get("password_hash");
    let role_str: String = row.get("role");
    let created_at_str: String = row.get("created_at");

    let id = UserId::from_str(&id_str).map_err(|e| {
        StoreError::SerializationError(format!("Invalid UserId '{}': {}", id_str, e))
    })?;

    let email = Email::new(email_str.clone()).map_err(|e| {
        StoreError::SerializationError(format!("Invalid Email '{}': {}", email_str, e))
    })?;

    let role = Role::from_str(&role_str).map_err(|e| {
        StoreError::SerializationError(format!("Invalid Role '{}': {}", role_str, e))
    })?;

    let created_at = parse_datetime(&created_at_str)?;

    Ok(User::from_parts(id, email, password_hash, role, created_at))
}

#[async_trait::async_trait]
impl IUserRepository for SqliteUserRepository {
    async fn insert(&self, user: &User) -> anyhow::Result<()> {
        let id = user.id().to_string();
        let created_at = user.created_at().to_rfc3339();

        sqlx::query(
            "INSERT INTO users (id, email, password_hash, role, created_at) \
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(user.email().as_str())
        .bind(user.password_hash())
        .bind(user.role().as_str())
        .bind(&created_at)
        .execute(&self.pool)
        .await?;

        tracing::trace!(user_id = %id, "Inserted user");
        Ok(())
    }

    async fn get(&self, id: &UserId) -> anyhow::Result<Option<User>> {
        let id_str = id.to_string();

        let row = sqlx::query("SELECT * FROM users WHERE id = ?")
            .bind(&id_str)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(ref r) => Ok(Some(user_from_row(r)?)),
            None => Ok(None),
        }
    }

    async fn get_by_email(&self, email: &Email) -> anyhow::Result<Option<User>> {
        let row = sqlx::query("SELECT * FROM users WHERE email = ?")
            .bind(email.as_str())
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(ref r) => Ok(Some(user_from_row(r)?)),
            None => Ok(None),
        }
    }

    async fn update_role(&self, id: &UserId, role: Role) -> anyhow::Result<bool> {
        let id_str = id.to_string();

        let result = sqlx::query("UPDATE users SET role = ? WHERE id = ?")
            .bind(role.as_str())
            .bind(&id_str)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
