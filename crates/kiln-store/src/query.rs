//! Queries over one kind of entity.

use kiln_types::Key;
use serde_json::Value;

use crate::document::Document;

/// Equality filter on a named top-level property.
#[derive(Clone, Debug, PartialEq)]
pub struct Filter {
    pub field: String,
    pub value: Value,
}

impl Filter {
    /// Returns `true` if `document` has `field` set to exactly `value`.
    pub fn matches(&self, document: &Document) -> bool {
        document.get(&self.field) == Some(&self.value)
    }
}

/// A query against one kind.
///
/// ```
/// use kiln_store::Query;
///
/// let q = Query::new("Post").filter("state", "active").limit(10);
/// assert_eq!(q.kind(), "Post");
/// assert_eq!(q.filters().len(), 1);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Query {
    kind: String,
    filters: Vec<Filter>,
    ancestor: Option<Key>,
    offset: usize,
    limit: Option<usize>,
}

impl Query {
    /// A query matching every entity of `kind`.
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            filters: Vec::new(),
            ancestor: None,
            offset: 0,
            limit: None,
        }
    }

    /// Keep only entities whose `field` equals `value`.
    pub fn filter(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filters.push(Filter {
            field: field.into(),
            value: value.into(),
        });
        self
    }

    /// Keep only entities at or below `ancestor`.
    pub fn ancestor(mut self, ancestor: Key) -> Self {
        self.ancestor = Some(ancestor);
        self
    }

    /// Skip the first `offset` matches.
    pub fn offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    /// Return at most `limit` matches.
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }

    pub fn ancestor_key(&self) -> Option<&Key> {
        self.ancestor.as_ref()
    }

    pub fn skip(&self) -> usize {
        self.offset
    }

    pub fn max_results(&self) -> Option<usize> {
        self.limit
    }

    /// Evaluate kind, ancestor and filters against one stored entity.
    ///
    /// Offset and limit apply to the result set and are not checked here.
    pub fn matches(&self, key: &Key, document: &Document) -> bool {
        key.kind() == self.kind
            && self.ancestor.as_ref().map_or(true, |a| key.has_ancestor(a))
            && self.filters.iter().all(|f| f.matches(document))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(state: &str) -> Document {
        let mut d = Document::new();
        d.insert("state".into(), Value::from(state));
        d
    }

    #[test]
    fn builder_collects_parts() {
        let parent = Key::with_name("User", "clark", None);
        let q = Query::new("Post")
            .filter("state", "active")
            .filter("views", 3)
            .ancestor(parent.clone())
            .offset(2)
            .limit(5);
        assert_eq!(q.kind(), "Post");
        assert_eq!(q.filters().len(), 2);
        assert_eq!(q.filters()[1].value, Value::from(3));
        assert_eq!(q.ancestor_key(), Some(&parent));
        assert_eq!(q.skip(), 2);
        assert_eq!(q.max_results(), Some(5));
    }

    #[test]
    fn matches_checks_kind_and_filters() {
        let q = Query::new("Post").filter("state", "active");
        let key = Key::with_id("Post", 1, None);
        assert!(q.matches(&key, &doc("active")));
        assert!(!q.matches(&key, &doc("deleted")));
        assert!(!q.matches(&key, &Document::new()));
        assert!(!q.matches(&Key::with_id("User", 1, None), &doc("active")));
    }

    #[test]
    fn matches_checks_ancestor() {
        let clark = Key::with_name("User", "clark", None);
        let lois = Key::with_name("User", "lois", None);
        let q = Query::new("Post").ancestor(clark.clone());
        assert!(q.matches(&Key::with_id("Post", 1, Some(clark)), &Document::new()));
        assert!(!q.matches(&Key::with_id("Post", 1, Some(lois)), &Document::new()));
        assert!(!q.matches(&Key::with_id("Post", 1, None), &Document::new()));
    }
}
