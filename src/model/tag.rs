use crate::framework::{AccessError, DomainObject};
use serde_json::{json, Value};

/// A label attached to posts.
#[derive(Debug, Clone, PartialEq)]
pub struct Tag {
    pub id: u64,
    pub name: String,
}

impl Tag {
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self { id, name: name.into() }
    }
}

impl DomainObject for Tag {
    fn id(&self) -> String {
        self.id.to_string()
    }

    fn field(&self, name: &str) -> Result<Value, AccessError> {
        match name {
            "name" => Ok(json!(self.name)),
            _ => Err(AccessError::no_such_member(self.type_name(), name)),
        }
    }
}
