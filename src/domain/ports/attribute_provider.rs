//! Attribute provider port.

use async_trait::async_trait;

use crate::domain::errors::LookupError;
use crate::domain::models::{AttributeKind, AttributeValue};

/// Remote source of truth for one attribute kind.
#[async_trait]
pub trait AttributeProvider: Send + Sync {
    /// The kind this provider answers for.
    fn kind(&self) -> AttributeKind;

    /// Fetch the attribute for `name`, bypassing any cache.
    async fn fetch(&self, name: &str) -> Result<AttributeValue, LookupError>;
}
