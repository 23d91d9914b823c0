//! Message log port.

use async_trait::async_trait;

use crate::domain::errors::DomainResult;
use crate::domain::models::{PublishReceipt, QueueMessage};

/// Partitioned, offset-addressed topic log.
#[async_trait]
pub trait MessageLog: Send + Sync {
    /// Append a raw payload to `topic`/`partition`.
    async fn append(&self, topic: &str, partition: i32, payload: &[u8]) -> DomainResult<PublishReceipt>;

    /// Read up to `limit` messages with `offset >= from_offset`, oldest first.
    async fn fetch(
        &self,
        topic: &str,
        partition: i32,
        from_offset: i64,
        limit: u32,
    ) -> DomainResult<Vec<QueueMessage>>;

    /// Oldest offset still retained in the partition, if any message exists.
    async fn oldest_offset(&self, topic: &str, partition: i32) -> DomainResult<Option<i64>>;

    /// Offset the group should resume from, if it has committed one.
    async fn committed_offset(&self, group: &str, topic: &str, partition: i32) -> DomainResult<Option<i64>>;

    /// Record that the group has handled everything before `next_offset`.
    async fn commit_offset(&self, group: &str, topic: &str, partition: i32, next_offset: i64) -> DomainResult<()>;
}
