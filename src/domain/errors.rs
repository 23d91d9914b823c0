//! Domain errors for the enrichment pipeline.

use thiserror::Error;

use super::models::AttributeKind;

/// Raw input (HTTP body or queue payload) could not be turned into a person.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// Not valid JSON, or not an object of the expected shape.
    #[error("Malformed person payload: {0}")]
    Malformed(String),

    /// A required field is absent or blank.
    #[error("Missing or blank field: {0}")]
    MissingField(&'static str),
}

/// A single attribute lookup failed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LookupError {
    /// The request could not be sent, timed out, or its body could not be read.
    #[error("{kind} provider unreachable: {message}")]
    Transport {
        /// Attribute being looked up.
        kind: AttributeKind,
        /// Underlying transport error.
        message: String,
    },

    /// The provider answered with a non-success status or an unreadable body.
    #[error("{kind} provider error (status {status}): {message}")]
    Provider {
        /// Attribute being looked up.
        kind: AttributeKind,
        /// HTTP status, or 0 when the status was fine but the value was not.
        status: u16,
        /// Response body or parse error.
        message: String,
    },

    /// The provider has no usable value for this name.
    #[error("No {kind} data found for name '{name}'")]
    NotFound {
        /// Attribute being looked up.
        kind: AttributeKind,
        /// Name the provider had no answer for.
        name: String,
    },
}

impl LookupError {
    /// Attribute kind whose lookup failed.
    pub const fn kind(&self) -> AttributeKind {
        match self {
            Self::Transport { kind, .. } | Self::Provider { kind, .. } | Self::NotFound { kind, .. } => {
                *kind
            }
        }
    }
}

/// Domain-level errors that can occur in the pipeline.
#[derive(Debug, Error)]
pub enum DomainError {
    /// Input could not be decoded.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// An attribute lookup failed.
    #[error("Enrichment failed: {0}")]
    Lookup(#[from] LookupError),

    /// No person with this identifier.
    #[error("Person not found: {0}")]
    PersonNotFound(i64),

    /// The record store failed.
    #[error("Database error: {0}")]
    DatabaseError(String),

    /// A stored value could not be converted.
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

/// Result alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;

impl From<sqlx::Error> for DomainError {
    fn from(err: sqlx::Error) -> Self {
        DomainError::DatabaseError(err.to_string())
    }
}

impl From<serde_json::Error> for DomainError {
    fn from(err: serde_json::Error) -> Self {
        DomainError::SerializationError(err.to_string())
    }
}
