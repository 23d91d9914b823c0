//! Port trait definitions (Hexagonal Architecture)
//!
//! This module defines async trait interfaces that infrastructure adapters must implement:
//! - PersonRepository: Record store for enriched people
//! - AttributeCache: Key/value cache in front of the enrichment providers
//! - AttributeProvider: Remote lookup of one attribute kind
//! - DeadLetterSink: Outbound channel for unprocessable payloads
//! - MessageLog: Topic/partition log the queue consumer reads from
//!
//! These traits define the contracts that allow the pipeline to be independent
//! of specific infrastructure implementations.

pub mod attribute_cache;
pub mod attribute_provider;
pub mod dead_letter_sink;
pub mod message_log;
pub mod person_repository;

pub use attribute_cache::{AttributeCache, CacheError};
pub use attribute_provider::AttributeProvider;
pub use dead_letter_sink::DeadLetterSink;
pub use message_log::MessageLog;
pub use person_repository::PersonRepository;
