//! Typed entities over a schemaless document store.
//!
//! Kiln maps application structs onto a [`Datastore`] and gives every one of
//! them the same lifecycle metadata: a [`Key`], an optional parent key, an
//! [`EntityState`] and created/updated/deleted timestamps. Deletion is soft:
//! it flips the state and is persisted like any other write.
//!
//! ```
//! use kiln::{entity, Meta, Options};
//! use kiln_store::MemoryDatastore;
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Default, Serialize, Deserialize)]
//! struct User {
//!     #[serde(flatten)]
//!     meta: Meta,
//!     username: String,
//! }
//! entity!(User, "User");
//!
//! let store = MemoryDatastore::new();
//! let mut jim = User { username: "Jim".into(), ..Default::default() };
//! kiln::put(&store, &mut jim, Options::new()).unwrap();
//!
//! let key = jim.meta.key.clone().unwrap();
//! let mut copy = User::default();
//! kiln::get(&store, &mut copy, Options::new().with_key(key)).unwrap();
//! assert_eq!(copy.username, "Jim");
//!
//! kiln::delete(&store, &mut jim).unwrap();
//! assert!(jim.meta.is_deleted());
//! ```
//!
//! # Modules
//!
//! - [`meta`] — the metadata block and the entity capability traits
//! - [`options`] — key and parent options applied before an operation
//! - [`lifecycle`] — get, put and soft delete
//! - [`query`] — queries that skip soft-deleted entities
//! - [`clock`] — time sources for lifecycle timestamps

pub mod clock;
pub mod error;
pub mod lifecycle;
pub mod meta;
pub mod options;
pub mod query;

pub use clock::{Clock, MonotonicClock, SystemClock};
pub use error::{Error, Result};
pub use lifecycle::{delete, get, put, Mapper};
pub use meta::{Entity, EntityState, HasMeta, Meta, STATE_FIELD};
pub use options::{with_int_id, with_key, with_parent, with_string_id, KeySpec, Options};
pub use query::{query, query_for};

pub use kiln_store::{Datastore, DatastoreExt, Query, StoreError};
pub use kiln_types::{Key, KeyId};
