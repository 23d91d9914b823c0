//! Cache-aside lookup of a single attribute kind.

use std::sync::Arc;

use crate::domain::errors::LookupError;
use crate::domain::models::{AttributeKind, AttributeValue};
use crate::domain::ports::{AttributeCache, AttributeProvider};

/// Resolves one attribute kind for a name, consulting the cache before the
/// remote provider and writing successful fetches back.
#[derive(Clone)]
pub struct EnrichmentClient {
    kind: AttributeKind,
    cache: Arc<dyn AttributeCache>,
    provider: Arc<dyn AttributeProvider>,
}

impl EnrichmentClient {
    /// The client answers for whatever kind `provider` serves.
    pub fn new(cache: Arc<dyn AttributeCache>, provider: Arc<dyn AttributeProvider>) -> Self {
        Self {
            kind: provider.kind(),
            cache,
            provider,
        }
    }

    /// Kind this client resolves.
    pub fn kind(&self) -> AttributeKind {
        self.kind
    }

    /// Resolve the attribute for `name`, from the cache if possible.
    pub async fn resolve(&self, name: &str) -> Result<AttributeValue, LookupError> {
        if let Some(value) = self.cached(name).await {
            tracing::debug!(kind = %self.kind, name, "cache hit");
            return Ok(value);
        }

        let value = self.provider.fetch(name).await?;
        if value.kind() != self.kind {
            return Err(LookupError::Provider {
                kind: self.kind,
                status: 0,
                message: format!("provider returned a {} value", value.kind()),
            });
        }

        if let Err(e) = self.cache.set(self.kind, name, &value.to_cache_string()).await {
            tracing::warn!(kind = %self.kind, name, error = %e, "failed to write attribute cache");
        }

        Ok(value)
    }

    async fn cached(&self, name: &str) -> Option<AttributeValue> {
        match self.cache.get(self.kind, name).await {
            Ok(Some(raw)) => {
                let parsed = AttributeValue::from_cache_string(self.kind, &raw);
                if parsed.is_none() {
                    tracing::warn!(kind = %self.kind, name, cached = %raw, "ignoring unparseable cache entry");
                }
                parsed
            }
            Ok(None) => None,
            Err(e) => {
                tracing::warn!(kind = %self.kind, name, error = %e, "attribute cache read failed");
                None
            }
        }
    }
}
