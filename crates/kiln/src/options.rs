//! Key and parent options applied to an entity before an operation runs.
//!
//! Options only write into the entity's [`Meta`]. They never check each
//! other: setting a key twice keeps the last one.

use kiln_types::Key;

use crate::meta::Meta;

/// Which key an operation should address.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum KeySpec {
    /// Leave `meta.key` as it is.
    #[default]
    Unset,
    /// Use this key verbatim.
    Explicit(Key),
    /// A parentless key of the entity's kind with this string id.
    StringId(String),
    /// A parentless key of the entity's kind with this integer id.
    IntId(i64),
}

/// Options for [`get`](crate::get) and [`put`](crate::put).
///
/// ```
/// use kiln::{KeySpec, Options};
///
/// let opts = Options::new().with_int_id(25).with_string_id("clark");
/// assert_eq!(opts.key(), &KeySpec::StringId("clark".into()));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Options {
    key: KeySpec,
    parent: Option<Key>,
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    /// Address the entity by `key`.
    pub fn with_key(mut self, key: Key) -> Self {
        self.key = KeySpec::Explicit(key);
        self
    }

    /// Set the entity's parent. An entity without a key is then stored
    /// under a store-assigned key below `parent`.
    pub fn with_parent(mut self, parent: Key) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Address the entity by a string id within its kind.
    pub fn with_string_id(mut self, id: impl Into<String>) -> Self {
        self.key = KeySpec::StringId(id.into());
        self
    }

    /// Address the entity by an integer id within its kind.
    pub fn with_int_id(mut self, id: i64) -> Self {
        self.key = KeySpec::IntId(id);
        self
    }

    pub fn key(&self) -> &KeySpec {
        &self.key
    }

    pub fn parent(&self) -> Option<&Key> {
        self.parent.as_ref()
    }

    /// Write these options into `meta` for an entity of `kind`.
    pub(crate) fn apply(self, kind: &str, meta: &mut Meta) {
        if let Some(parent) = self.parent {
            meta.parent = Some(parent);
        }
        match self.key {
            KeySpec::Unset => {}
            KeySpec::Explicit(key) => meta.key = Some(key),
            KeySpec::StringId(id) => meta.key = Some(Key::with_name(kind, id, None)),
            KeySpec::IntId(id) => meta.key = Some(Key::with_id(kind, id, None)),
        }
    }
}

impl From<Key> for Options {
    fn from(key: Key) -> Self {
        Options::new().with_key(key)
    }
}

/// Shorthand for `Options::new().with_key(key)`.
pub fn with_key(key: Key) -> Options {
    Options::new().with_key(key)
}

/// Shorthand for `Options::new().with_parent(parent)`.
pub fn with_parent(parent: Key) -> Options {
    Options::new().with_parent(parent)
}

/// Shorthand for `Options::new().with_string_id(id)`.
pub fn with_string_id(id: impl Into<String>) -> Options {
    Options::new().with_string_id(id)
}

/// Shorthand for `Options::new().with_int_id(id)`.
pub fn with_int_id(id: i64) -> Options {
    Options::new().with_int_id(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn clark() -> Key {
        Key::with_name("User", "clark", None)
    }

    fn applied(opts: Options) -> Meta {
        let mut meta = Meta::default();
        opts.apply("User", &mut meta);
        meta
    }

    #[test]
    fn empty_options_change_nothing() {
        let mut meta = Meta {
            key: Some(clark()),
            ..Default::default()
        };
        Options::new().apply("User", &mut meta);
        assert_eq!(meta.key, Some(clark()));
        assert!(meta.parent.is_none());
    }

    #[test]
    fn explicit_key_is_verbatim() {
        let post = Key::with_id("Post", 4, Some(clark()));
        assert_eq!(applied(with_key(post.clone())).key, Some(post));
    }

    #[test]
    fn ids_build_parentless_keys_of_kind() {
        let meta = applied(with_string_id("clark"));
        assert_eq!(meta.key, Some(clark()));

        let meta = applied(with_int_id(25));
        assert_eq!(meta.key, Some(Key::with_id("User", 25, None)));
    }

    #[test]
    fn parent_does_not_scope_explicit_ids() {
        let org = Key::with_name("Org", "planet", None);
        let meta = applied(with_parent(org.clone()).with_string_id("clark"));
        assert_eq!(meta.parent, Some(org));
        assert_eq!(meta.key, Some(clark()));
    }

    #[test]
    fn parent_alone_leaves_key_unset() {
        let meta = applied(with_parent(clark()));
        assert_eq!(meta.parent, Some(clark()));
        assert!(meta.key.is_none());
    }

    #[test]
    fn from_key() {
        assert_eq!(Options::from(clark()), with_key(clark()));
    }

    #[derive(Clone, Debug)]
    enum Step {
        Key(i64),
        Str(String),
        Int(i64),
    }

    fn step() -> impl Strategy<Value = Step> {
        prop_oneof![
            (1i64..1000).prop_map(Step::Key),
            "[a-z]{1,8}".prop_map(Step::Str),
            (1i64..1000).prop_map(Step::Int),
        ]
    }

    proptest! {
        #[test]
        fn last_key_option_wins(steps in proptest::collection::vec(step(), 1..6)) {
            let mut opts = Options::new();
            for s in &steps {
                opts = match s.clone() {
                    Step::Key(id) => opts.with_key(Key::with_id("Post", id, Some(clark()))),
                    Step::Str(id) => opts.with_string_id(id),
                    Step::Int(id) => opts.with_int_id(id),
                };
            }
            let expected = match steps.last().cloned() {
                Some(Step::Key(id)) => Key::with_id("Post", id, Some(clark())),
                Some(Step::Str(id)) => Key::with_name("User", id, None),
                Some(Step::Int(id)) => Key::with_id("User", id, None),
                None => unreachable!(),
            };
            prop_assert_eq!(applied(opts).key, Some(expected));
        }
    }
}
