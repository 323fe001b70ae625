//! Read-through / write-through caching over any [`Datastore`].

use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use kiln_types::Key;
use lru::LruCache;
use tracing::trace;

use crate::document::Document;
use crate::error::{StoreError, StoreResult};
use crate::query::Query;
use crate::traits::Datastore;

/// Hit and miss counters for a [`CachedDatastore`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
}

/// An LRU cache in front of another datastore.
///
/// Reads by key are served from the cache when possible and fill it on a
/// miss. Writes go to the inner store first and are cached under the key it
/// returns. A "not found" answer is never cached. Queries always go to the
/// inner store.
///
/// The cache lock is held across the inner call on a miss and on a write,
/// so the cached copy of a key always matches the last write the inner
/// store accepted.
pub struct CachedDatastore<S> {
    inner: S,
    cache: Mutex<LruCache<Key, Document>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl<S: Datastore> CachedDatastore<S> {
    /// Wrap `inner` with a cache holding at most `capacity` documents.
    pub fn new(inner: S, capacity: NonZeroUsize) -> Self {
        Self {
            inner,
            cache: Mutex::new(LruCache::new(capacity)),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// The wrapped store.
    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Current hit and miss counts.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }

    /// Number of cached documents.
    pub fn cached_len(&self) -> usize {
        self.cache.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// Drop the cached copy of `key`, if any.
    pub fn invalidate(&self, key: &Key) -> StoreResult<()> {
        self.lock()?.pop(key);
        Ok(())
    }

    /// Drop every cached document.
    pub fn clear(&self) -> StoreResult<()> {
        self.lock()?.clear();
        Ok(())
    }

    fn lock(&self) -> StoreResult<std::sync::MutexGuard<'_, LruCache<Key, Document>>> {
        self.cache.lock().map_err(|_| StoreError::LockPoisoned)
    }
}

impl<S: Datastore> Datastore for CachedDatastore<S> {
    fn get(&self, key: &Key) -> StoreResult<Document> {
        let mut cache = self.lock()?;
        if let Some(document) = cache.get(key) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            trace!(key = %key, "cache hit");
            return Ok(document.clone());
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        trace!(key = %key, "cache miss");
        let document = self.inner.get(key)?;
        cache.put(key.clone(), document.clone());
        Ok(document)
    }

    fn put(&self, key: &Key, document: Document) -> StoreResult<Key> {
        let mut cache = self.lock()?;
        let stored = self.inner.put(key, document.clone())?;
        cache.put(stored.clone(), document);
        Ok(stored)
    }

    fn run(&self, query: &Query) -> StoreResult<Vec<(Key, Document)>> {
        self.inner.run(query)
    }
}

impl<S: Datastore + std::fmt::Debug> std::fmt::Debug for CachedDatastore<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let cached = self.cached_len();
        f.debug_struct("CachedDatastore")
            .field("inner", &self.inner)
            .field("cached", &cached)
            .field("hits", &self.hits.load(Ordering::Relaxed))
            .field("misses", &self.misses.load(Ordering::Relaxed))
            .finish()
    }
}
