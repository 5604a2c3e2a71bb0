//! Administrator repository

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use link_catalog_shared::Admin;
use sqlx::PgPool;

/// Persistence operations for administrator accounts
#[async_trait]
pub trait AdminStore: Send + Sync {
    async fn find_by_username(&self, username: &str) -> Result<Option<Admin>>;
    async fn find_by_id(&self, id: i64) -> Result<Option<Admin>>;
    /// Returns false when no admin has `id`
    async fn update_password(&self, id: i64, password_hash: &str) -> Result<bool>;
    async fn count(&self) -> Result<i64>;
    async fn create(&self, username: &str, password_hash: &str) -> Result<Admin>;
}

/// Admin record from database
#[derive(Debug, Clone, sqlx::FromRow)]
struct AdminRecord {
    id: i64,
    username: String,
    password: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<AdminRecord> for Admin {
    fn from(r: AdminRecord) -> Self {
        Admin {
            id: r.id,
            username: r.username,
            password_hash: r.password,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

/// PostgreSQL-backed admin store
#[derive(Clone)]
pub struct PgAdminStore {
    pool: PgPool,
}

impl PgAdminStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AdminStore for PgAdminStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<Admin>> {
        let record = sqlx::query_as::<_, AdminRecord>(
            r#"
            SELECT id, username, password, created_at, updated_at
            FROM admins
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record.map(Into::into))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Admin>> {
        let record = sqlx::query_as::<_, AdminRecord>(
            r#"
            SELECT id, username, password, created_at, updated_at
            FROM admins
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record.map(Into::into))
    }

    async fn update_password(&self, id: i64, password_hash: &str) -> Result<bool> {
        let result = sqlx::query(
            r#"UPDATE admins SET password = $2, updated_at = NOW() WHERE id = $1"#,
        )
        .bind(id)
        .bind(password_hash)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>(r#"SELECT COUNT(*) FROM admins"#)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    async fn create(&self, username: &str, password_hash: &str) -> Result<Admin> {
        let record = sqlx::query_as::<_, AdminRecord>(
            r#"
            INSERT INTO admins (username, password)
            VALUES ($1, $2)
            RETURNING id, username, password, created_at, updated_at
            "#,
        )
        .bind(username)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await?;

        Ok(record.into())
    }
}
