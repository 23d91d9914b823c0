//! Domain layer for the enrichment pipeline
//!
//! This module contains the person model, error taxonomy and port traits.

pub mod errors;
pub mod models;
pub mod ports;

pub use errors::{DecodeError, DomainError, DomainResult, LookupError};
