//! Domain models.

pub mod config;
pub mod message;
pub mod person;

pub use config::{
    CacheBackend, CacheConfig, Config, DatabaseConfig, LoggingConfig, ProvidersConfig, QueueConfig,
    ServerConfig,
};
pub use message::{PublishReceipt, QueueMessage};
pub use person::{AttributeKind, AttributeValue, Enrichment, NewPerson, Person, PersonInput};
