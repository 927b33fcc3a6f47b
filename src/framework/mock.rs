//! # Mock Objects
//!
//! Utilities for testing descriptors and the resolver without writing a domain type.
//!
//! [`MockObject`] is a map-backed [`DomainObject`] with a fluent builder. Its runtime
//! type name is whatever string you give it, so one Rust type can stand in for a whole
//! polymorphic hierarchy.
//!
//! # Example
//! ```ignore
//! let author = MockObject::new("User", 5).field("name", "J").into_ref();
//! let post = MockObject::new("Post", 1)
//!     .field("title", "T")
//!     .one("user", author)
//!     .into_ref();
//! ```
//!
//! # Cycles
//! Relations can also be attached after construction with [`MockObject::link`], which is
//! how tests build self-referential graphs. Such graphs are never freed; keep them in tests.

use crate::framework::error::AccessError;
use crate::framework::object::{DomainObject, ObjectRef, Related};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// A domain object backed by plain maps.
#[derive(Debug)]
pub struct MockObject {
    type_name: String,
    id: String,
    fields: Map<String, Value>,
    relations: RwLock<HashMap<String, Related>>,
}

impl MockObject {
    /// Creates an object with the given runtime type name and identity.
    pub fn new(type_name: impl Into<String>, id: impl ToString) -> Self {
        Self {
            type_name: type_name.into(),
            id: id.to_string(),
            fields: Map::new(),
            relations: RwLock::new(HashMap::new()),
        }
    }

    pub fn field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Adds a to-one relation.
    pub fn one(self, name: impl Into<String>, object: ObjectRef) -> Self {
        self.with_relation(name, Related::One(Some(object)))
    }

    /// Adds an empty to-one relation.
    pub fn none(self, name: impl Into<String>) -> Self {
        self.with_relation(name, Related::One(None))
    }

    /// Adds a to-many relation.
    pub fn many(self, name: impl Into<String>, objects: Vec<ObjectRef>) -> Self {
        self.with_relation(name, Related::Many(objects))
    }

    fn with_relation(self, name: impl Into<String>, related: Related) -> Self {
        self.link(name, related);
        self
    }

    /// Attaches (or replaces) a relation on an already shared object.
    pub fn link(&self, name: impl Into<String>, related: impl Into<Related>) {
        let mut relations = self
            .relations
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        relations.insert(name.into(), related.into());
    }

    pub fn into_arc(self) -> Arc<MockObject> {
        Arc::new(self)
    }

    pub fn into_ref(self) -> ObjectRef {
        Arc::new(self)
    }
}

impl DomainObject for MockObject {
    fn type_name(&self) -> &str {
        &self.type_name
    }

    fn id(&self) -> String {
        self.id.clone()
    }

    fn field(&self, name: &str) -> Result<Value, AccessError> {
        self.fields
            .get(name)
            .cloned()
            .ok_or_else(|| AccessError::no_such_member(&self.type_name, name))
    }

    fn relation(&self, name: &str) -> Result<Related, AccessError> {
        let relations = self
            .relations
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        relations
            .get(name)
            .cloned()
            .ok_or_else(|| AccessError::no_such_member(&self.type_name, name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_mock_object_answers_fields_and_relations() {
        let user = MockObject::new("User", 5).field("name", "J").into_ref();
        let post = MockObject::new("Post", 1)
            .field("title", "T")
            .field("draft", Value::Null)
            .one("user", user)
            .none("editor")
            .many("tags", vec![])
            .into_ref();

        assert_eq!(post.type_name(), "Post");
        assert_eq!(post.id(), "1");
        assert_eq!(post.field("title"), Ok(json!("T")));
        assert_eq!(post.field("draft"), Ok(Value::Null));
        assert_eq!(
            post.field("nope"),
            Err(AccessError::no_such_member("Post", "nope"))
        );
        assert_eq!(post.relation("user").unwrap().len(), 1);
        assert!(post.relation("editor").unwrap().is_empty());
        assert!(post.relation("tags").unwrap().is_empty());
        assert!(post.relation("comments").is_err());
    }

    #[test]
    fn test_link_builds_cycles() {
        let a = MockObject::new("Node", "a").into_arc();
        let b = MockObject::new("Node", "b").into_arc();
        a.link("next", b.clone() as ObjectRef);
        b.link("next", a.clone() as ObjectRef);

        let next = a.relation("next").unwrap();
        let b_again = next.iter().next().unwrap();
        let back = b_again.relation("next").unwrap();
        assert_eq!(back.iter().next().unwrap().id(), "a");
    }
}
