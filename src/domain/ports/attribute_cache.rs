//! Attribute cache port.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::models::AttributeKind;

/// Cache backend failure.
#[derive(Debug, Error)]
pub enum CacheError {
    /// The backend could not be reached or rejected the operation.
    #[error("Cache backend unavailable: {0}")]
    Unavailable(String),
}

impl From<sqlx::Error> for CacheError {
    fn from(err: sqlx::Error) -> Self {
        CacheError::Unavailable(err.to_string())
    }
}

/// Expiry-less key/value cache keyed by `(kind, name)`.
///
/// Values are immutable facts per name, so concurrent writers for the same
/// key need no coordination: the last write wins.
#[async_trait]
pub trait AttributeCache: Send + Sync {
    /// Look up a cached value. `Ok(None)` is a miss.
    async fn get(&self, kind: AttributeKind, name: &str) -> Result<Option<String>, CacheError>;

    /// Store a value, replacing any previous one.
    async fn set(&self, kind: AttributeKind, name: &str, value: &str) -> Result<(), CacheError>;
}
