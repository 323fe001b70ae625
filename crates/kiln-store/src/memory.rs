use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::RwLock;

use kiln_types::Key;
use tracing::debug;

use crate::document::Document;
use crate::error::{StoreError, StoreResult};
use crate::query::Query;
use crate::traits::Datastore;

/// In-memory, `BTreeMap`-based document store.
///
/// Intended for tests and embedding. Documents are held behind a `RwLock`
/// and cloned on read and write. Integer ids for incomplete keys come from
/// a single counter shared by all kinds. The counter skips ids already
/// taken and moves past any integer id written explicitly, so an assigned
/// key never lands on an existing entity.
pub struct MemoryDatastore {
    entities: RwLock<BTreeMap<Key, Document>>,
    next_id: AtomicI64,
}

impl MemoryDatastore {
    /// Create an empty store that assigns ids starting at 1.
    pub fn new() -> Self {
        Self::with_first_id(1)
    }

    /// Create an empty store that assigns ids starting at `first_id`.
    pub fn with_first_id(first_id: i64) -> Self {
        Self {
            entities: RwLock::new(BTreeMap::new()),
            next_id: AtomicI64::new(first_id.max(1)),
        }
    }

    /// Number of entities currently stored.
    pub fn len(&self) -> usize {
        self.entities
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .len()
    }

    /// Returns `true` if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every stored key, in key order.
    pub fn keys(&self) -> StoreResult<Vec<Key>> {
        let map = self.entities.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(map.keys().cloned().collect())
    }

    /// Complete `key` with the first free id. Called with the write lock held.
    fn allocate(&self, key: &Key, map: &BTreeMap<Key, Document>) -> Key {
        loop {
            let candidate = key.completed(self.next_id.fetch_add(1, Ordering::Relaxed));
            if !map.contains_key(&candidate) {
                return candidate;
            }
        }
    }
}

impl Default for MemoryDatastore {
    fn default() -> Self {
        Self::new()
    }
}

impl Datastore for MemoryDatastore {
    fn get(&self, key: &Key) -> StoreResult<Document> {
        key.validate_complete()?;
        let map = self.entities.read().map_err(|_| StoreError::LockPoisoned)?;
        map.get(key)
            .cloned()
            .ok_or_else(|| StoreError::NoSuchEntity(key.clone()))
    }

    fn put(&self, key: &Key, document: Document) -> StoreResult<Key> {
        key.validate()?;
        let mut map = self.entities.write().map_err(|_| StoreError::LockPoisoned)?;
        let key = if key.is_complete() {
            if let Some(id) = key.int_id() {
                self.next_id.fetch_max(id.saturating_add(1), Ordering::Relaxed);
            }
            key.clone()
        } else {
            self.allocate(key, &map)
        };
        map.insert(key.clone(), document);
        debug!(key = %key, "stored entity");
        Ok(key)
    }

    fn run(&self, query: &Query) -> StoreResult<Vec<(Key, Document)>> {
        let map = self.entities.read().map_err(|_| StoreError::LockPoisoned)?;
        let matches = map
            .iter()
            .filter(|(key, document)| query.matches(key, document))
            .skip(query.skip())
            .take(query.max_results().unwrap_or(usize::MAX))
            .map(|(key, document)| (key.clone(), document.clone()))
            .collect();
        Ok(matches)
    }
}

impl std::fmt::Debug for MemoryDatastore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryDatastore")
            .field("entity_count", &self.len())
            .finish()
    }
}
