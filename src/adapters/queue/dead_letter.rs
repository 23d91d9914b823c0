//! Dead-letter sink writing to a topic of the message log.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::errors::DomainResult;
use crate::domain::models::PublishReceipt;
use crate::domain::ports::{DeadLetterSink, MessageLog};

/// Dead-letter sink that appends to a topic of the message log.
#[derive(Clone)]
pub struct LogDeadLetterSink {
    log: Arc<dyn MessageLog>,
    topic: String,
    partition: i32,
}

impl LogDeadLetterSink {
    /// Sink appending to `topic`/`partition` of `log`.
    pub fn new(log: Arc<dyn MessageLog>, topic: impl Into<String>, partition: i32) -> Self {
        Self {
            log,
            topic: topic.into(),
            partition,
        }
    }

    /// Topic dead letters are appended to.
    pub fn topic(&self) -> &str {
        &self.topic
    }
}

#[async_trait]
impl DeadLetterSink for LogDeadLetterSink {
    async fn publish(&self, payload: &[u8]) -> DomainResult<PublishReceipt> {
        let receipt = self.log.append(&self.topic, self.partition, payload).await?;
        tracing::info!(
            topic = %self.topic,
            partition = receipt.partition,
            offset = receipt.offset,
            "message forwarded to dead-letter topic"
        );
        Ok(receipt)
    }
}
