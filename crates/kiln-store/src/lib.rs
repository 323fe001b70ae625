//! Schemaless document storage for Kiln.
//!
//! This crate defines what the mapper needs from a key-value document store
//! and ships two backends that satisfy it. Entities are stored as
//! [`Document`]s (JSON objects) addressed by [`Key`](kiln_types::Key).
//!
//! # Storage Backends
//!
//! All backends implement the [`Datastore`] trait:
//!
//! - [`MemoryDatastore`] -- `BTreeMap`-based store for tests and embedding
//! - [`CachedDatastore`] -- read-through/write-through LRU cache over any other backend
//!
//! [`DatastoreExt`] layers typed reads and writes over any backend.
//!
//! # Design Rules
//!
//! 1. Reads by key fail with [`StoreError::NoSuchEntity`] when nothing is stored.
//! 2. Writes accept incomplete keys and return the key actually used.
//! 3. Query results come back in key order, paired with their keys.
//! 4. The store never interprets document contents beyond equality filters.

pub mod cache;
pub mod config;
pub mod document;
pub mod error;
pub mod memory;
pub mod query;
pub mod traits;

pub use cache::{CacheStats, CachedDatastore};
pub use config::{CacheConfig, StoreConfig};
pub use document::{from_document, to_document, Document};
pub use error::{StoreError, StoreResult};
pub use memory::MemoryDatastore;
pub use query::{Filter, Query};
pub use traits::{Datastore, DatastoreExt};
