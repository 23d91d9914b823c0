//! SQLite database migration management.

use sqlx::SqlitePool;
use thiserror::Error;

/// Migration failures.
#[derive(Debug, Error)]
pub enum MigrationError {
    /// A migration script or its bookkeeping failed.
    #[error("Failed to execute migration {version}: {source}")]
    ExecutionError {
        /// Version of the failing migration; 0 for the bookkeeping table.
        version: i64,
        /// Underlying error.
        #[source]
        source: sqlx::Error,
    },
    /// The current schema version could not be read.
    #[error("Failed to get schema version: {0}")]
    VersionCheckError(#[source] sqlx::Error),
}

/// One embedded schema migration.
#[derive(Debug, Clone)]
pub struct Migration {
    /// Monotonic schema version.
    pub version: i64,
    /// Recorded alongside the version in `schema_migrations`.
    pub description: String,
    /// Script run inside a single transaction.
    pub sql: String,
}

/// Applies embedded migrations newer than the recorded schema version.
pub struct Migrator {
    pool: SqlitePool,
}

impl Migrator {
    /// Migrator over `pool`.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Apply pending migrations in order. Returns how many ran.
    pub async fn run_embedded_migrations(&self, migrations: Vec<Migration>) -> Result<usize, MigrationError> {
        self.ensure_migrations_table().await?;
        let current_version = self.get_current_version().await?;
        let pending: Vec<_> = migrations.into_iter().filter(|m| m.version > current_version).collect();

        if pending.is_empty() {
            return Ok(0);
        }

        for migration in &pending {
            self.apply_migration(migration).await?;
            tracing::debug!(version = migration.version, description = %migration.description, "applied migration");
        }

        Ok(pending.len())
    }

    async fn ensure_migrations_table(&self) -> Result<(), MigrationError> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS schema_migrations (
                version INTEGER PRIMARY KEY,
                applied_at TEXT NOT NULL DEFAULT (datetime('now')),
                description TEXT
            )"
        )
        .execute(&self.pool)
        .await
        .map_err(|e| MigrationError::ExecutionError { version: 0, source: e })?;
        Ok(())
    }

    /// Highest applied version, or 0 on a fresh database.
    pub async fn get_current_version(&self) -> Result<i64, MigrationError> {
        let result: Option<(i64,)> = sqlx::query_as("SELECT COALESCE(MAX(version), 0) FROM schema_migrations")
            .fetch_optional(&self.pool)
            .await
            .map_err(MigrationError::VersionCheckError)?;
        Ok(result.map(|(v,)| v).unwrap_or(0))
    }

    async fn apply_migration(&self, migration: &Migration) -> Result<(), MigrationError> {
        let to_error = |e: sqlx::Error| MigrationError::ExecutionError { version: migration.version, source: e };

        let mut tx = self.pool.begin().await.map_err(to_error)?;
        sqlx::raw_sql(&migration.sql)
            .execute(&mut *tx)
            .await
            .map_err(to_error)?;
        sqlx::query("INSERT INTO schema_migrations (version, description) VALUES (?, ?)")
            .bind(migration.version)
            .bind(&migration.description)
            .execute(&mut *tx)
            .await
            .map_err(to_error)?;
        tx.commit().await.map_err(to_error)?;
        Ok(())
    }
}

/// Version 1: `persons`.
pub fn create_persons_migration() -> Migration {
    Migration {
        version: 1,
        description: "Create persons table".to_string(),
        sql: include_str!("../../../migrations/001_create_persons.sql").to_string(),
    }
}

/// Version 2: `messages` and `consumer_offsets`.
pub fn create_message_log_migration() -> Migration {
    Migration {
        version: 2,
        description: "Create queue message log and consumer offsets".to_string(),
        sql: include_str!("../../../migrations/002_create_message_log.sql").to_string(),
    }
}

/// Version 3: `attribute_cache`.
pub fn create_attribute_cache_migration() -> Migration {
    Migration {
        version: 3,
        description: "Create attribute cache table".to_string(),
        sql: include_str!("../../../migrations/003_create_attribute_cache.sql").to_string(),
    }
}

/// Every migration, in version order.
pub fn all_embedded_migrations() -> Vec<Migration> {
    vec![
        create_persons_migration(),
        create_message_log_migration(),
        create_attribute_cache_migration(),
    ]
}
