use crate::framework::{AccessError, DomainObject, ObjectRef, Related};
use crate::model::{Person, Post};
use serde_json::{json, Value};
use std::sync::{Arc, Weak};

/// A reader's comment on a [`Post`].
#[derive(Debug)]
pub struct Comment {
    pub id: u64,
    pub body: String,
    pub author: Arc<Person>,
    post: Weak<Post>,
}

impl Comment {
    pub fn new(id: u64, body: impl Into<String>, author: Arc<Person>, post: Weak<Post>) -> Self {
        Self {
            id,
            body: body.into(),
            author,
            post,
        }
    }

    /// The commented post, if it is still alive.
    pub fn post(&self) -> Option<Arc<Post>> {
        self.post.upgrade()
    }
}

impl DomainObject for Comment {
    fn id(&self) -> String {
        self.id.to_string()
    }

    fn field(&self, name: &str) -> Result<Value, AccessError> {
        match name {
            "body" => Ok(json!(self.body)),
            _ => Err(AccessError::no_such_member(self.type_name(), name)),
        }
    }

    fn relation(&self, name: &str) -> Result<Related, AccessError> {
        match name {
            "author" => Ok(Related::One(Some(self.author.clone() as ObjectRef))),
            "post" => Ok(Related::One(self.post().map(|p| p as ObjectRef))),
            _ => Err(AccessError::no_such_member(self.type_name(), name)),
        }
    }
}
