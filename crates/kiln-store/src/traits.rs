use std::sync::Arc;

use kiln_types::Key;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::document::{from_document, to_document, Document};
use crate::error::StoreResult;
use crate::query::Query;

/// Schemaless key-value document store.
///
/// All implementations must satisfy these invariants:
/// - `get` requires a complete key and reports a missing entity as
///   [`StoreError::NoSuchEntity`](crate::StoreError::NoSuchEntity).
/// - `put` accepts an incomplete key, assigns an identifier to it, and
///   returns the concrete key the document was stored under.
/// - `run` returns every matching document paired with its key, in key order.
/// - Concurrent writes to the same key are last-writer-wins.
pub trait Datastore: Send + Sync {
    /// Read the document stored under `key`.
    fn get(&self, key: &Key) -> StoreResult<Document>;

    /// Write `document` under `key` and return the key actually used.
    fn put(&self, key: &Key, document: Document) -> StoreResult<Key>;

    /// Execute a query.
    fn run(&self, query: &Query) -> StoreResult<Vec<(Key, Document)>>;
}

impl<T: Datastore + ?Sized> Datastore for &T {
    fn get(&self, key: &Key) -> StoreResult<Document> {
        (**self).get(key)
    }

    fn put(&self, key: &Key, document: Document) -> StoreResult<Key> {
        (**self).put(key, document)
    }

    fn run(&self, query: &Query) -> StoreResult<Vec<(Key, Document)>> {
        (**self).run(query)
    }
}

impl<T: Datastore + ?Sized> Datastore for Box<T> {
    fn get(&self, key: &Key) -> StoreResult<Document> {
        (**self).get(key)
    }

    fn put(&self, key: &Key, document: Document) -> StoreResult<Key> {
        (**self).put(key, document)
    }

    fn run(&self, query: &Query) -> StoreResult<Vec<(Key, Document)>> {
        (**self).run(query)
    }
}

impl<T: Datastore + ?Sized> Datastore for Arc<T> {
    fn get(&self, key: &Key) -> StoreResult<Document> {
        (**self).get(key)
    }

    fn put(&self, key: &Key, document: Document) -> StoreResult<Key> {
        (**self).put(key, document)
    }

    fn run(&self, query: &Query) -> StoreResult<Vec<(Key, Document)>> {
        (**self).run(query)
    }
}

/// Typed reads and writes over any [`Datastore`].
pub trait DatastoreExt: Datastore {
    /// Read the entity under `key` and deserialize it.
    fn get_as<T: DeserializeOwned>(&self, key: &Key) -> StoreResult<T> {
        from_document(self.get(key)?)
    }

    /// Serialize `value` and write it under `key`.
    fn put_from<T: Serialize + ?Sized>(&self, key: &Key, value: &T) -> StoreResult<Key> {
        self.put(key, to_document(value)?)
    }

    /// Run a query and deserialize every result.
    ///
    /// Keys come back in a separate vector, index-aligned with the results.
    /// They are not attached to the deserialized values.
    fn get_all<T: DeserializeOwned>(&self, query: &Query) -> StoreResult<(Vec<Key>, Vec<T>)> {
        let rows = self.run(query)?;
        let mut keys = Vec::with_capacity(rows.len());
        let mut values = Vec::with_capacity(rows.len());
        for (key, document) in rows {
            values.push(from_document(document)?);
            keys.push(key);
        }
        Ok((keys, values))
    }
}

impl<S: Datastore + ?Sized> DatastoreExt for S {}
