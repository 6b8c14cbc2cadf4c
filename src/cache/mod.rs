//! Cache module for storing API responses
//!
//! This module provides a TTL-governed key-value store that keeps the last
//! successful response for each request so the client can keep showing data
//! while offline. Entries older than the store's TTL read as absent.

mod backend;
mod store;

pub use backend::{CacheBackend, FileBackend, MemoryBackend};
pub use store::{open_store, CacheEntry, CacheStore, DEFAULT_TTL_MINUTES};
