//! Dead-letter sink port.

use async_trait::async_trait;

use crate::domain::errors::DomainResult;
use crate::domain::models::PublishReceipt;

/// Append-only outbound channel for payloads the pipeline could not process.
#[async_trait]
pub trait DeadLetterSink: Send + Sync {
    /// Forward the raw payload unchanged.
    async fn publish(&self, payload: &[u8]) -> DomainResult<PublishReceipt>;
}
