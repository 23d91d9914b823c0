//! Message log domain model.

use serde::{Deserialize, Serialize};

/// A raw message read from a topic partition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueMessage {
    /// Topic the message was read from.
    pub topic: String,
    /// Partition within the topic.
    pub partition: i32,
    /// Position within the partition, starting at 0.
    pub offset: i64,
    /// Raw bytes, exactly as published.
    pub payload: Vec<u8>,
}

impl QueueMessage {
    /// Offset to commit once this message has been handled.
    pub fn next_offset(&self) -> i64 {
        self.offset + 1
    }
}

/// Where an appended message landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishReceipt {
    /// Partition the message was appended to.
    pub partition: i32,
    /// Offset assigned to the message.
    pub offset: i64,
}
