//! Process-local `AttributeCache` backed by moka.

use async_trait::async_trait;
use moka::future::Cache;

use crate::domain::models::AttributeKind;
use crate::domain::ports::{AttributeCache, CacheError};

/// Default number of `(kind, name)` entries kept before eviction.
const DEFAULT_MAX_CAPACITY: u64 = 100_000;

/// In-process attribute cache backed by moka.
#[derive(Clone)]
pub struct MokaAttributeCache {
    entries: Cache<(AttributeKind, String), String>,
}

impl MokaAttributeCache {
    /// Cache with the default capacity.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_MAX_CAPACITY)
    }

    /// Cache holding at most `max_capacity` entries.
    pub fn with_capacity(max_capacity: u64) -> Self {
        let entries = Cache::builder().max_capacity(max_capacity).build();
        Self { entries }
    }
}

impl Default for MokaAttributeCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AttributeCache for MokaAttributeCache {
    async fn get(&self, kind: AttributeKind, name: &str) -> Result<Option<String>, CacheError> {
        Ok(self.entries.get(&(kind, name.to_string())).await)
    }

    async fn set(&self, kind: AttributeKind, name: &str, value: &str) -> Result<(), CacheError> {
        self.entries.insert((kind, name.to_string()), value.to_string()).await;
        Ok(())
    }
}
