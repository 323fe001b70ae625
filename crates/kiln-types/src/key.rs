use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::TypeError;

/// Identifier component of a [`Key`].
///
/// A key is identified either by a caller-chosen string, a caller-chosen or
/// store-assigned positive integer, or nothing yet. Keys in the last state
/// are *incomplete*: they may be written, and the store picks the id.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum KeyId {
    /// No identifier yet; the store assigns one on write.
    Incomplete,
    /// Caller-chosen string identifier.
    Name(String),
    /// Integer identifier, caller-chosen or store-assigned.
    Id(i64),
}

/// Storage address of one entity.
///
/// A key names the entity's kind, its identifier within that kind, and an
/// optional parent key. Parents give hierarchical namespacing: two entities
/// with the same kind and id but different parents are different entities.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Key {
    kind: String,
    id: KeyId,
    parent: Option<Box<Key>>,
}

impl Key {
    /// An incomplete key of the given kind, optionally under a parent.
    pub fn incomplete(kind: impl Into<String>, parent: Option<Key>) -> Self {
        Self::new(kind, KeyId::Incomplete, parent)
    }

    /// A key identified by a string.
    pub fn with_name(kind: impl Into<String>, name: impl Into<String>, parent: Option<Key>) -> Self {
        Self::new(kind, KeyId::Name(name.into()), parent)
    }

    /// A key identified by an integer.
    pub fn with_id(kind: impl Into<String>, id: i64, parent: Option<Key>) -> Self {
        Self::new(kind, KeyId::Id(id), parent)
    }

    fn new(kind: impl Into<String>, id: KeyId, parent: Option<Key>) -> Self {
        Self {
            kind: kind.into(),
            id,
            parent: parent.map(Box::new),
        }
    }

    /// The kind this key belongs to.
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// The identifier component.
    pub fn id(&self) -> &KeyId {
        &self.id
    }

    /// The string identifier, if this key has one.
    pub fn string_id(&self) -> Option<&str> {
        match &self.id {
            KeyId::Name(name) => Some(name),
            _ => None,
        }
    }

    /// The integer identifier, if this key has one.
    pub fn int_id(&self) -> Option<i64> {
        match self.id {
            KeyId::Id(id) => Some(id),
            _ => None,
        }
    }

    /// The parent key, if any.
    pub fn parent(&self) -> Option<&Key> {
        self.parent.as_deref()
    }

    /// Returns `true` if the identifier component is set.
    pub fn is_complete(&self) -> bool {
        !matches!(self.id, KeyId::Incomplete)
    }

    /// Returns `true` if `ancestor` is this key or one of its parents.
    pub fn has_ancestor(&self, ancestor: &Key) -> bool {
        let mut current = Some(self);
        while let Some(key) = current {
            if key == ancestor {
                return true;
            }
            current = key.parent();
        }
        false
    }

    /// This key with its identifier replaced by a store-assigned integer.
    pub fn completed(&self, id: i64) -> Self {
        Self {
            kind: self.kind.clone(),
            id: KeyId::Id(id),
            parent: self.parent.clone(),
        }
    }

    /// Check the structural rules every key must satisfy.
    ///
    /// The kind must be non-empty, a string id non-empty, an integer id
    /// positive, and every ancestor complete and valid. The key itself may
    /// be incomplete.
    pub fn validate(&self) -> Result<(), TypeError> {
        if self.kind.is_empty() {
            return Err(self.invalid("empty kind"));
        }
        match &self.id {
            KeyId::Name(name) if name.is_empty() => return Err(self.invalid("empty string id")),
            KeyId::Id(id) if *id <= 0 => return Err(self.invalid("non-positive integer id")),
            _ => {}
        }
        if let Some(parent) = self.parent() {
            parent.validate_complete()?;
        }
        Ok(())
    }

    /// Like [`validate`](Key::validate), but also rejects an incomplete key.
    pub fn validate_complete(&self) -> Result<(), TypeError> {
        self.validate()?;
        if !self.is_complete() {
            return Err(self.invalid("incomplete key"));
        }
        Ok(())
    }

    /// Opaque, URL-safe encoding of this key.
    pub fn encode(&self) -> String {
        let segments: Vec<Value> = self
            .path()
            .into_iter()
            .map(|key| {
                let id = match &key.id {
                    KeyId::Incomplete => Value::Null,
                    KeyId::Name(name) => Value::from(name.as_str()),
                    KeyId::Id(id) => Value::from(*id),
                };
                Value::Array(vec![Value::from(key.kind.as_str()), id])
            })
            .collect();
        hex::encode(Value::Array(segments).to_string())
    }

    /// Parse a key produced by [`encode`](Key::encode).
    pub fn decode(s: &str) -> Result<Self, TypeError> {
        let bytes = hex::decode(s).map_err(|e| TypeError::InvalidHex(e.to_string()))?;
        let segments: Vec<(String, Value)> = serde_json::from_slice(&bytes)
            .map_err(|e| TypeError::InvalidEncoding(e.to_string()))?;

        let mut key: Option<Key> = None;
        for (kind, id) in segments {
            let id = match id {
                Value::Null => KeyId::Incomplete,
                Value::String(name) => KeyId::Name(name),
                Value::Number(n) => n.as_i64().map(KeyId::Id).ok_or_else(|| {
                    TypeError::InvalidEncoding(format!("integer id out of range: {n}"))
                })?,
                other => {
                    return Err(TypeError::InvalidEncoding(format!(
                        "unexpected id component: {other}"
                    )))
                }
            };
            key = Some(Key::new(kind, id, key));
        }

        let key = key.ok_or_else(|| TypeError::InvalidEncoding("empty key path".into()))?;
        key.validate()?;
        Ok(key)
    }

    /// Root-first list of the keys on the path to this one.
    fn path(&self) -> Vec<&Key> {
        let mut path = Vec::new();
        let mut current = Some(self);
        while let Some(key) = current {
            path.push(key);
            current = key.parent();
        }
        path.reverse();
        path
    }

    fn invalid(&self, reason: &str) -> TypeError {
        TypeError::InvalidKey {
            key: self.to_string(),
            reason: reason.to_string(),
        }
    }
}

impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Key({self})")
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(parent) = self.parent() {
            write!(f, "{parent}")?;
        }
        match &self.id {
            KeyId::Incomplete => write!(f, "/{},?", self.kind),
            KeyId::Name(name) => write!(f, "/{},{:?}", self.kind, name),
            KeyId::Id(id) => write!(f, "/{},{}", self.kind, id),
        }
    }
}
