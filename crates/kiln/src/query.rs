//! Queries that skip soft-deleted entities.
//!
//! Query results are not hydrated: the store hands back keys next to the
//! deserialized entities, and callers reattach them if they need them.
//!
//! ```
//! use kiln::{entity, query_for, DatastoreExt, Meta, Options};
//! use kiln_store::MemoryDatastore;
//! # use serde::{Deserialize, Serialize};
//! # #[derive(Default, Serialize, Deserialize)]
//! # struct Post { #[serde(flatten)] meta: Meta, title: String }
//! # entity!(Post, "Post");
//!
//! let store = MemoryDatastore::new();
//! let mut post = Post { title: "hello".into(), ..Default::default() };
//! kiln::put(&store, &mut post, Options::new()).unwrap();
//!
//! let (keys, mut posts) = store.get_all::<Post>(&query_for::<Post>()).unwrap();
//! assert!(posts[0].meta.key.is_none());
//! for (post, key) in posts.iter_mut().zip(keys) {
//!     post.meta.key = Some(key);
//! }
//! ```

use kiln_store::Query;

use crate::meta::{Entity, EntityState, STATE_FIELD};

/// A query over `kind` that only matches active entities.
pub fn query(kind: impl Into<String>) -> Query {
    Query::new(kind).filter(STATE_FIELD, EntityState::Active)
}

/// [`query`] for the kind of `E`.
pub fn query_for<E: Entity>() -> Query {
    query(E::KIND)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle::{delete, put};
    use crate::meta::Meta;
    use crate::options::{with_parent, Options};
    use kiln_store::{DatastoreExt, MemoryDatastore};
    use kiln_types::Key;
    use proptest::prelude::*;
    use serde::{Deserialize, Serialize};
    use serde_json::Value;

    #[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
    struct User {
        #[serde(flatten)]
        meta: Meta,
        username: String,
    }
    crate::entity!(User, "User");

    #[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
    struct Post {
        #[serde(flatten)]
        meta: Meta,
        content: String,
    }
    crate::entity!(Post, "Post");

    #[test]
    fn query_filters_on_active_state() {
        let q = query("User");
        assert_eq!(q.kind(), "User");
        assert_eq!(q.filters().len(), 1);
        assert_eq!(q.filters()[0].field, "state");
        assert_eq!(q.filters()[0].value, Value::from("active"));
        assert_eq!(query_for::<Post>().kind(), "Post");
    }

    #[test]
    fn results_are_not_hydrated() {
        let store = MemoryDatastore::new();
        let mut jim = User {
            username: "Jim".into(),
            ..Default::default()
        };
        put(&store, &mut jim, Options::new()).unwrap();

        let (keys, users) = store.get_all::<User>(&query_for::<User>()).unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].username, "Jim");
        assert!(users[0].meta.key.is_none());
        assert!(users[0].meta.parent.is_none());
        assert_eq!(Some(&keys[0]), jim.meta.key.as_ref());
    }

    #[test]
    fn narrows_with_ancestor_and_extra_filters() {
        let store = MemoryDatastore::new();
        let clark = Key::with_name("User", "clark", None);
        let lois = Key::with_name("User", "lois", None);
        for (parent, content) in [(&clark, "a"), (&clark, "b"), (&lois, "c")] {
            let mut post = Post {
                content: content.into(),
                ..Default::default()
            };
            put(&store, &mut post, with_parent(parent.clone())).unwrap();
        }

        let (_, posts) = store
            .get_all::<Post>(&query_for::<Post>().ancestor(clark.clone()))
            .unwrap();
        assert_eq!(posts.len(), 2);

        let (_, posts) = store
            .get_all::<Post>(&query_for::<Post>().filter("content", "c"))
            .unwrap();
        assert_eq!(posts.len(), 1);
    }

    proptest! {
        #[test]
        fn never_returns_deleted(deleted in proptest::collection::vec(any::<bool>(), 0..24)) {
            let store = MemoryDatastore::new();
            for (i, gone) in deleted.iter().enumerate() {
                let mut u = User { username: format!("user{i}"), ..Default::default() };
                put(&store, &mut u, Options::new()).unwrap();
                if *gone {
                    delete(&store, &mut u).unwrap();
                }
            }

            let (keys, users) = store.get_all::<User>(&query("User")).unwrap();
            prop_assert!(users.iter().all(|u| u.meta.is_active()));
            prop_assert_eq!(keys.len(), deleted.iter().filter(|d| !**d).count());
            prop_assert_eq!(store.len(), deleted.len());
        }
    }
}
