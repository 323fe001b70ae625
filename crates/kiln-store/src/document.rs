//! The schemaless body of a stored entity.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{StoreError, StoreResult};

/// A stored entity body: named top-level properties with JSON values.
pub type Document = Map<String, Value>;

/// Serialize a value into a document.
///
/// Fails unless the value serializes to a JSON object.
pub fn to_document<T: Serialize + ?Sized>(value: &T) -> StoreResult<Document> {
    match serde_json::to_value(value).map_err(|e| StoreError::Serialization(e.to_string()))? {
        Value::Object(map) => Ok(map),
        other => Err(StoreError::Serialization(format!(
            "expected a map of properties, got {}",
            kind_of(&other)
        ))),
    }
}

/// Deserialize a document into a typed value.
pub fn from_document<T: DeserializeOwned>(document: Document) -> StoreResult<T> {
    serde_json::from_value(Value::Object(document))
        .map_err(|e| StoreError::Serialization(e.to_string()))
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "a map",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Post {
        title: String,
        views: u32,
    }

    #[test]
    fn struct_becomes_document() {
        let post = Post { title: "hello".into(), views: 3 };
        let doc = to_document(&post).unwrap();
        assert_eq!(doc.get("title"), Some(&Value::from("hello")));
        assert_eq!(doc.get("views"), Some(&Value::from(3)));
        assert_eq!(from_document::<Post>(doc).unwrap(), post);
    }

    #[test]
    fn non_map_values_are_rejected() {
        let err = to_document(&42).unwrap_err();
        assert!(matches!(err, StoreError::Serialization(ref m) if m.contains("a number")));
        assert!(to_document(&vec![1, 2]).is_err());
    }

    #[test]
    fn shape_mismatch_is_a_serialization_error() {
        let mut doc = Document::new();
        doc.insert("title".into(), Value::from(17));
        let err = from_document::<Post>(doc).unwrap_err();
        assert!(matches!(err, StoreError::Serialization(_)));
    }
}
