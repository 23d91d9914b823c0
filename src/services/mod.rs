//! Application services: enrichment, person management and queue ingestion.

pub mod enrichment_client;
pub mod enrichment_service;
pub mod person_service;
pub mod queue_consumer;

pub use enrichment_client::EnrichmentClient;
pub use enrichment_service::EnrichmentService;
pub use person_service::PersonService;
pub use queue_consumer::{IngestOutcome, QueueConsumer};
