//! Sequential consumer for the person topic.
//!
//! Messages are handled strictly one at a time, in the order the poller
//! delivers them. Every message ends in exactly one [`IngestOutcome`], after
//! which its offset is committed so a restart resumes after it.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::domain::errors::DomainError;
use crate::domain::models::QueueMessage;
use crate::domain::ports::{DeadLetterSink, MessageLog};

use super::person_service::PersonService;

/// What happened to a single queue message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestOutcome {
    /// Enriched and stored under this identifier.
    Persisted(i64),
    /// Could not be decoded and was forwarded to the dead-letter topic.
    DeadLettered,
    /// Decoded, but a lookup failed; nothing was stored.
    EnrichmentFailed,
    /// Enriched, but the store rejected it.
    PersistFailed,
}

impl IngestOutcome {
    /// Label used in logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Persisted(_) => "persisted",
            Self::DeadLettered => "dead_lettered",
            Self::EnrichmentFailed => "enrichment_failed",
            Self::PersistFailed => "persist_failed",
        }
    }
}

/// Handles messages from a [`TopicPoller`](crate::adapters::queue::TopicPoller) channel one at a time.
pub struct QueueConsumer {
    people: PersonService,
    dead_letters: Arc<dyn DeadLetterSink>,
    log: Arc<dyn MessageLog>,
    group: String,
    dead_letter_enrichment_failures: bool,
}

impl QueueConsumer {
    /// Consumer committing offsets for `group` in `log`. Enrichment failures are only logged.
    pub fn new(
        people: PersonService,
        dead_letters: Arc<dyn DeadLetterSink>,
        log: Arc<dyn MessageLog>,
        group: impl Into<String>,
    ) -> Self {
        Self {
            people,
            dead_letters,
            log,
            group: group.into(),
            dead_letter_enrichment_failures: false,
        }
    }

    /// Also forward messages whose enrichment failed to the dead-letter sink.
    pub fn with_dead_letter_enrichment_failures(mut self, enabled: bool) -> Self {
        self.dead_letter_enrichment_failures = enabled;
        self
    }

    /// Drain `rx` until it closes or `cancel` fires. A message already being
    /// handled is finished before returning.
    pub async fn run(self, mut rx: mpsc::Receiver<QueueMessage>, cancel: CancellationToken) {
        tracing::info!(group = %self.group, "queue consumer started");

        loop {
            let message = tokio::select! {
                _ = cancel.cancelled() => break,
                next = rx.recv() => match next {
                    Some(message) => message,
                    None => break,
                },
            };

            self.handle(&message).await;
        }

        tracing::info!(group = %self.group, "queue consumer stopped");
    }

    /// Process one message and commit its offset.
    pub async fn handle(&self, message: &QueueMessage) -> IngestOutcome {
        let outcome = self.ingest(message).await;

        if let Err(e) = self
            .log
            .commit_offset(&self.group, &message.topic, message.partition, message.next_offset())
            .await
        {
            tracing::error!(
                topic = %message.topic,
                partition = message.partition,
                offset = message.offset,
                error = %e,
                "failed to commit consumer offset"
            );
        }

        outcome
    }

    async fn ingest(&self, message: &QueueMessage) -> IngestOutcome {
        let input = match self.people.decode(&message.payload) {
            Ok(input) => input,
            Err(e) => {
                tracing::warn!(offset = message.offset, error = %e, "undecodable message");
                self.dead_letter(message).await;
                return IngestOutcome::DeadLettered;
            }
        };

        let name = input.name.clone();
        match self.people.create(input).await {
            Ok(person) => {
                tracing::info!(offset = message.offset, person_id = person.id, "message ingested");
                IngestOutcome::Persisted(person.id)
            }
            Err(DomainError::Lookup(e)) => {
                tracing::error!(offset = message.offset, name = %name, kind = %e.kind(), error = %e, "enrichment failed");
                if self.dead_letter_enrichment_failures {
                    self.dead_letter(message).await;
                }
                IngestOutcome::EnrichmentFailed
            }
            Err(e) => {
                tracing::error!(offset = message.offset, name = %name, error = %e, "failed to persist person");
                IngestOutcome::PersistFailed
            }
        }
    }

    async fn dead_letter(&self, message: &QueueMessage) {
        if let Err(e) = self.dead_letters.publish(&message.payload).await {
            tracing::error!(offset = message.offset, error = %e, "failed to publish dead letter");
        }
    }
}
