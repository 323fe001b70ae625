//! The metadata block every entity carries.

use std::fmt;

use chrono::{DateTime, Utc};
use kiln_types::Key;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Name of the stored property holding an entity's [`EntityState`].
pub const STATE_FIELD: &str = "state";

/// Lifecycle state of a persisted entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityState {
    Active,
    Deleted,
}

impl EntityState {
    /// The stored label: `"active"` or `"deleted"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityState::Active => "active",
            EntityState::Deleted => "deleted",
        }
    }
}

impl fmt::Display for EntityState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<EntityState> for Value {
    fn from(state: EntityState) -> Self {
        Value::from(state.as_str())
    }
}

/// Identity and lifecycle metadata owned by every entity.
///
/// `key` and `parent` are the entity's storage address. They are never part
/// of the stored document; the lifecycle operations supply and restore them.
/// `state` is stored so that queries can filter on it. A timestamp of `None`
/// has not been set yet.
///
/// Entities usually flatten the block into their own body:
///
/// ```
/// use kiln::Meta;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Default, Serialize, Deserialize)]
/// struct Post {
///     #[serde(flatten)]
///     meta: Meta,
///     title: String,
/// }
/// kiln::entity!(Post, "Post");
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Meta {
    #[serde(skip)]
    pub key: Option<Key>,
    #[serde(skip)]
    pub parent: Option<Key>,
    /// `None` until the first put.
    pub state: Option<EntityState>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Meta {
    pub fn is_active(&self) -> bool {
        self.state == Some(EntityState::Active)
    }

    pub fn is_deleted(&self) -> bool {
        self.state == Some(EntityState::Deleted)
    }

    /// Returns `true` once the entity holds a concrete, store-assigned or
    /// caller-chosen key.
    pub fn is_persisted(&self) -> bool {
        self.key.as_ref().is_some_and(Key::is_complete)
    }
}

/// Access to an entity's [`Meta`].
pub trait HasMeta {
    fn meta(&self) -> &Meta;
    fn meta_mut(&mut self) -> &mut Meta;
}

/// A storable entity.
///
/// `KIND` names the namespace the entity is stored and queried under. It is
/// declared explicitly so that renaming the Rust type does not move data.
pub trait Entity: HasMeta + Serialize + DeserializeOwned {
    const KIND: &'static str;
}

/// Implement [`HasMeta`] and [`Entity`] for a struct owning a [`Meta`] field.
///
/// The field is named `meta` unless a third argument says otherwise.
///
/// ```
/// # use kiln::Meta;
/// # use serde::{Deserialize, Serialize};
/// #[derive(Serialize, Deserialize)]
/// struct Comment {
///     #[serde(flatten)]
///     info: Meta,
///     body: String,
/// }
/// kiln::entity!(Comment, "Comment", info);
/// ```
#[macro_export]
macro_rules! entity {
    ($ty:ty, $kind:expr, $field:ident) => {
        impl $crate::HasMeta for $ty {
            fn meta(&self) -> &$crate::Meta {
                &self.$field
            }

            fn meta_mut(&mut self) -> &mut $crate::Meta {
                &mut self.$field
            }
        }

        impl $crate::Entity for $ty {
            const KIND: &'static str = $kind;
        }
    };
    ($ty:ty, $kind:expr) => {
        $crate::entity!($ty, $kind, meta);
    };
}
