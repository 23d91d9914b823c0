//! fio-enricher - person record ingestion with attribute enrichment
//!
//! Person records (name, surname, patronymic) arrive over HTTP (REST and
//! GraphQL) or from a durable topic log. Each record is enriched with age,
//! gender and nationality inferred from its given name by external providers,
//! with a shared cache in front of them, and then persisted.
//!
//! # Architecture
//!
//! This crate follows Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain`): models, errors and port traits
//! - **Service Layer** (`services`): enrichment, person management, queue consumption
//! - **Adapters** (`adapters`): SQLite, moka, reqwest providers, axum/async-graphql, queue plumbing
//! - **Infrastructure Layer** (`infrastructure`): configuration and logging
//! - **Application Layer** (`application`): wiring and process lifecycle
//! - **CLI Layer** (`cli`): command-line interface

pub mod adapters;
pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use application::Application;
pub use domain::errors::{DecodeError, DomainError, DomainResult, LookupError};
pub use domain::models::{
    AttributeKind, AttributeValue, Config, NewPerson, Person, PersonInput, PublishReceipt, QueueMessage,
};
pub use domain::ports::{AttributeCache, AttributeProvider, DeadLetterSink, MessageLog, PersonRepository};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use services::{EnrichmentService, IngestOutcome, PersonService, QueueConsumer};
