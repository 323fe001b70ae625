//! Get, put and soft delete.
//!
//! Every operation makes at most one call into the store and otherwise only
//! touches the entity it was handed. Store errors come back unchanged; a
//! failed put keeps whatever it already wrote into the entity's metadata.

use kiln_store::{Datastore, DatastoreExt};
use kiln_types::Key;
use tracing::{debug, warn};

use crate::clock::{Clock, SystemClock};
use crate::error::{Error, Result};
use crate::meta::{Entity, EntityState};
use crate::options::Options;

/// Lifecycle operations bound to one store and one clock.
///
/// ```
/// use kiln::{Mapper, Meta, MonotonicClock, Options};
/// use kiln_store::MemoryDatastore;
/// # use serde::{Deserialize, Serialize};
/// # #[derive(Default, Serialize, Deserialize)]
/// # struct Post { #[serde(flatten)] meta: Meta, title: String }
/// # kiln::entity!(Post, "Post");
///
/// let store = MemoryDatastore::new();
/// let mapper = Mapper::new(&store).with_clock(MonotonicClock::new());
///
/// let mut post = Post { title: "hello".into(), ..Default::default() };
/// mapper.put(&mut post, Options::new()).unwrap();
/// mapper.put(&mut post, Options::new()).unwrap();
/// assert!(post.meta.updated_at > post.meta.created_at);
/// ```
pub struct Mapper<'s, S: ?Sized, C = SystemClock> {
    store: &'s S,
    clock: C,
}

impl<'s, S: Datastore + ?Sized> Mapper<'s, S> {
    /// Operations against `store`, stamped with the system clock.
    pub fn new(store: &'s S) -> Self {
        Self {
            store,
            clock: SystemClock,
        }
    }
}

impl<'s, S: Datastore + ?Sized, C: Clock> Mapper<'s, S, C> {
    /// Use `clock` for lifecycle timestamps.
    pub fn with_clock<D: Clock>(self, clock: D) -> Mapper<'s, S, D> {
        Mapper {
            store: self.store,
            clock,
        }
    }

    pub fn store(&self) -> &'s S {
        self.store
    }

    /// Load `entity` from the store.
    ///
    /// Options are applied first; the entity must then have a key or the
    /// call fails with [`Error::MissingKey`] without touching the store. On
    /// success every stored field is overwritten and the key and parent are
    /// restored from the addressed key.
    pub fn get<E: Entity>(&self, entity: &mut E, options: Options) -> Result<()> {
        let meta = entity.meta_mut();
        options.apply(E::KIND, meta);
        let key = meta.key.clone().ok_or(Error::MissingKey)?;

        debug!(kind = E::KIND, key = %key, "get entity");
        *entity = self.store.get_as::<E>(&key)?;

        let meta = entity.meta_mut();
        meta.parent = key.parent().cloned();
        meta.key = Some(key);
        Ok(())
    }

    /// Store `entity`.
    ///
    /// An entity without a key gets an incomplete key under its parent and
    /// receives a concrete key from the store. The first put marks the
    /// entity active and sets `created_at`; every put sets `updated_at`. A
    /// deleted entity stays deleted.
    pub fn put<E: Entity>(&self, entity: &mut E, options: Options) -> Result<()> {
        let now = self.clock.now();
        let meta = entity.meta_mut();
        options.apply(E::KIND, meta);

        let key = match meta.key.clone() {
            Some(key) => {
                if meta.parent.is_some() && key.is_complete() && key.parent() != meta.parent.as_ref() {
                    warn!(
                        kind = E::KIND,
                        key = %key,
                        "parent differs from the key's parent and is ignored"
                    );
                }
                key
            }
            None => {
                let key = Key::incomplete(E::KIND, meta.parent.clone());
                meta.key = Some(key.clone());
                key
            }
        };

        if meta.state.is_none() {
            meta.state = Some(EntityState::Active);
        }
        meta.updated_at = Some(now);
        if meta.created_at.is_none() {
            meta.created_at = Some(now);
        }

        debug!(kind = E::KIND, key = %key, "put entity");
        let stored = self.store.put_from(&key, &*entity)?;
        entity.meta_mut().key = Some(stored);
        Ok(())
    }

    /// Soft-delete `entity`: mark it deleted and put it.
    ///
    /// Fails with [`Error::MissingKey`] without touching the store if the
    /// entity has never been given a key.
    pub fn delete<E: Entity>(&self, entity: &mut E) -> Result<()> {
        let meta = entity.meta_mut();
        let Some(key) = meta.key.as_ref() else {
            return Err(Error::MissingKey);
        };
        debug!(kind = E::KIND, key = %key, "soft-delete entity");

        meta.state = Some(EntityState::Deleted);
        meta.deleted_at = Some(self.clock.now());
        self.put(entity, Options::new())
    }
}

/// [`Mapper::get`] with the system clock.
pub fn get<S, E>(store: &S, entity: &mut E, options: Options) -> Result<()>
where
    S: Datastore + ?Sized,
    E: Entity,
{
    Mapper::new(store).get(entity, options)
}

/// [`Mapper::put`] with the system clock.
pub fn put<S, E>(store: &S, entity: &mut E, options: Options) -> Result<()>
where
    S: Datastore + ?Sized,
    E: Entity,
{
    Mapper::new(store).put(entity, options)
}

/// [`Mapper::delete`] with the system clock.
pub fn delete<S, E>(store: &S, entity: &mut E) -> Result<()>
where
    S: Datastore + ?Sized,
    E: Entity,
{
    Mapper::new(store).delete(entity)
}
