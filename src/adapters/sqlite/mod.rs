//! SQLite database adapters for the enrichment pipeline.

pub mod attribute_cache;
pub mod connection;
pub mod message_log;
pub mod migrations;
pub mod person_repository;

pub use attribute_cache::SqliteAttributeCache;
pub use connection::{create_pool, create_test_pool, ConnectionError, PoolConfig};
pub use message_log::SqliteMessageLog;
pub use migrations::{all_embedded_migrations, Migration, MigrationError, Migrator};
pub use person_repository::SqlitePersonRepository;

use sqlx::SqlitePool;

/// Errors bringing the database up.
#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    /// The pool could not be opened.
    #[error("Connection error: {0}")]
    Connection(#[from] ConnectionError),
    /// A migration failed.
    #[error("Migration error: {0}")]
    Migration(#[from] MigrationError),
    /// A query failed outside of migrations.
    #[error("Query error: {0}")]
    Query(#[from] sqlx::Error),
}

/// Open the database at `database_url` and bring its schema up to date.
pub async fn initialize_database(database_url: &str, config: PoolConfig) -> Result<SqlitePool, DatabaseError> {
    let pool = create_pool(database_url, Some(config)).await?;
    let migrator = Migrator::new(pool.clone());
    let applied = migrator.run_embedded_migrations(all_embedded_migrations()).await?;
    if applied > 0 {
        tracing::info!(applied, "database migrations applied");
    }
    Ok(pool)
}

/// Create an in-memory test pool with all migrations applied.
pub async fn create_migrated_test_pool() -> Result<SqlitePool, DatabaseError> {
    let pool = create_test_pool().await?;
    let migrator = Migrator::new(pool.clone());
    migrator.run_embedded_migrations(all_embedded_migrations()).await?;
    Ok(pool)
}
