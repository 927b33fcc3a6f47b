use crate::framework::{AccessError, DomainObject, ObjectRef, Related};
use crate::model::{Post, Vehicle};
use serde_json::{json, Value};
use std::sync::{Arc, OnceLock, Weak};

/// Represents a registered person: a blog author and a vehicle owner.
///
/// # Serialization
/// This struct implements the [`DomainObject`] trait, allowing it to be serialized
/// as a `people` (or `authors`) resource.
///
/// Posts are held weakly since every [`Post`] already owns its author.
#[derive(Debug)]
pub struct Person {
    pub id: u64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub vehicles: Vec<Arc<Vehicle>>,
    posts: OnceLock<Vec<Weak<Post>>>,
}

impl Person {
    /// Creates a new Person with no posts and no vehicles.
    ///
    /// # Arguments
    /// * `id` - Unique identifier
    /// * `first_name` - Given name
    /// * `last_name` - Family name
    /// * `email` - Contact address
    pub fn new(id: u64, first_name: impl Into<String>, last_name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id,
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
            vehicles: Vec::new(),
            posts: OnceLock::new(),
        }
    }

    pub fn with_vehicles(mut self, vehicles: Vec<Arc<Vehicle>>) -> Self {
        self.vehicles = vehicles;
        self
    }

    /// Records the posts written by this person. Only the first call has an effect.
    pub fn set_posts(&self, posts: &[Arc<Post>]) {
        let _ = self.posts.set(posts.iter().map(Arc::downgrade).collect());
    }

    /// Posts still alive, in publication order.
    pub fn posts(&self) -> Vec<Arc<Post>> {
        self.posts
            .get()
            .map(|posts| posts.iter().filter_map(Weak::upgrade).collect())
            .unwrap_or_default()
    }
}

impl DomainObject for Person {
    fn id(&self) -> String {
        self.id.to_string()
    }

    fn field(&self, name: &str) -> Result<Value, AccessError> {
        match name {
            "first_name" => Ok(json!(self.first_name)),
            "last_name" => Ok(json!(self.last_name)),
            "email" => Ok(json!(self.email)),
            _ => Err(AccessError::no_such_member(self.type_name(), name)),
        }
    }

    fn relation(&self, name: &str) -> Result<Related, AccessError> {
        match name {
            "posts" => Ok(Related::many(self.posts().into_iter().map(|p| p as ObjectRef))),
            "vehicles" => Ok(Related::many(self.vehicles.iter().map(|v| v.clone() as ObjectRef))),
            _ => Err(AccessError::no_such_member(self.type_name(), name)),
        }
    }
}
