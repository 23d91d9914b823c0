//! Topic partition poller.
//!
//! Tails one `(topic, partition)` of the message log and forwards each
//! message, in offset order, into a bounded channel. The channel applies
//! backpressure: the poller never runs more than `capacity` messages ahead of
//! the consumer. Offsets are committed by the consumer, not here.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::domain::errors::DomainResult;
use crate::domain::models::{QueueConfig, QueueMessage};
use crate::domain::ports::MessageLog;

/// Reads one topic partition in offset order and feeds a bounded channel.
#[derive(Clone)]
pub struct TopicPoller {
    log: Arc<dyn MessageLog>,
    group: String,
    topic: String,
    partition: i32,
    batch_size: u32,
    poll_interval: Duration,
}

impl TopicPoller {
    /// Poller for `topic`/`partition`, reading for consumer `group`.
    pub fn new(log: Arc<dyn MessageLog>, group: impl Into<String>, topic: impl Into<String>, partition: i32) -> Self {
        Self {
            log,
            group: group.into(),
            topic: topic.into(),
            partition,
            batch_size: 100,
            poll_interval: Duration::from_millis(500),
        }
    }

    /// Poller configured from the `queue` section.
    pub fn from_config(log: Arc<dyn MessageLog>, config: &QueueConfig) -> Self {
        Self::new(log, config.consumer_group.clone(), config.topic.clone(), config.partition)
            .with_batch_size(config.batch_size)
            .with_poll_interval(Duration::from_millis(config.poll_interval_ms))
    }

    /// Maximum messages fetched per poll. Clamped to at least 1.
    pub fn with_batch_size(mut self, batch_size: u32) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    /// Pause between polls that return nothing.
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Where reading starts: the group's committed offset, otherwise the
    /// oldest retained message.
    pub async fn starting_offset(&self) -> DomainResult<i64> {
        if let Some(committed) = self.log.committed_offset(&self.group, &self.topic, self.partition).await? {
            return Ok(committed);
        }
        Ok(self.log.oldest_offset(&self.topic, self.partition).await?.unwrap_or(0))
    }

    /// Spawn the poll loop, returning the receiving end of its channel.
    pub fn spawn(
        self,
        capacity: usize,
        cancel: CancellationToken,
    ) -> (mpsc::Receiver<QueueMessage>, JoinHandle<DomainResult<()>>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        let handle = tokio::spawn(self.run(tx, cancel));
        (rx, handle)
    }

    /// Poll until cancelled or until the receiver goes away.
    pub async fn run(self, tx: mpsc::Sender<QueueMessage>, cancel: CancellationToken) -> DomainResult<()> {
        let mut position = self.starting_offset().await?;
        tracing::info!(
            topic = %self.topic,
            partition = self.partition,
            group = %self.group,
            offset = position,
            "queue poller started"
        );

        loop {
            if cancel.is_cancelled() {
                break;
            }

            let batch = match self.log.fetch(&self.topic, self.partition, position, self.batch_size).await {
                Ok(batch) => batch,
                Err(e) => {
                    tracing::warn!(topic = %self.topic, error = %e, "failed to fetch from message log");
                    Vec::new()
                }
            };

            let drained = batch.len() < self.batch_size as usize;

            for message in batch {
                let next = message.next_offset();
                tokio::select! {
                    _ = cancel.cancelled() => {
                        tracing::info!(topic = %self.topic, "queue poller stopped");
                        return Ok(());
                    }
                    sent = tx.send(message) => {
                        if sent.is_err() {
                            tracing::debug!(topic = %self.topic, "consumer gone, stopping poller");
                            return Ok(());
                        }
                    }
                }
                position = next;
            }

            if drained {
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    _ = tokio::time::sleep(self.poll_interval) => {}
                }
            }
        }

        tracing::info!(topic = %self.topic, "queue poller stopped");
        Ok(())
    }
}
