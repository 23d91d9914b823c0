//! HTTP adapters for the name-inference providers (agify, genderize, nationalize).

pub mod client;
pub mod models;

pub use client::{build_http_client, HttpAttributeProvider};
