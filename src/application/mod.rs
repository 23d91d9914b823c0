//! Application layer: process assembly and lifecycle.

pub mod app;

pub use app::{connect_database, Application};
