//! Attribute cache stored in the main database.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;

use crate::domain::models::AttributeKind;
use crate::domain::ports::{AttributeCache, CacheError};

/// Attribute cache stored in the `attribute_cache` table.
#[derive(Clone)]
pub struct SqliteAttributeCache {
    pool: SqlitePool,
}

impl SqliteAttributeCache {
    /// Wrap an already migrated pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AttributeCache for SqliteAttributeCache {
    async fn get(&self, kind: AttributeKind, name: &str) -> Result<Option<String>, CacheError> {
        let value: Option<String> = sqlx::query_scalar("SELECT value FROM attribute_cache WHERE kind = ? AND name = ?")
            .bind(kind.as_str())
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;

        Ok(value)
    }

    async fn set(&self, kind: AttributeKind, name: &str, value: &str) -> Result<(), CacheError> {
        sqlx::query(
            r#"INSERT INTO attribute_cache (kind, name, value, updated_at)
               VALUES (?, ?, ?, ?)
               ON CONFLICT(kind, name) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at"#
        )
        .bind(kind.as_str())
        .bind(name)
        .bind(value)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
