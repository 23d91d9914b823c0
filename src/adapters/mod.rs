//! Infrastructure adapters for external systems.

pub mod cache;
pub mod http;
pub mod providers;
pub mod queue;
pub mod sqlite;
