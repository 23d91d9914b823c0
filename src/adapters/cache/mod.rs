//! In-memory attribute cache.
//!
//! Uses `moka` for a bounded concurrent cache. Entries never expire: an
//! attribute inferred for a name is treated as a stable fact.

pub mod memory_attribute_cache;

pub use memory_attribute_cache::MokaAttributeCache;
