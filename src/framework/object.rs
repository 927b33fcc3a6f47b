//! # Domain Object Protocol
//!
//! The serialization engine never looks inside your structs directly. Instead, every
//! domain type implements [`DomainObject`], a small capability interface that answers
//! three questions:
//!
//! - *What is your identity?* ([`DomainObject::id`])
//! - *What is the value of field `x`?* ([`DomainObject::field`])
//! - *What objects are related through `y`?* ([`DomainObject::relation`])
//!
//! Objects travel through the engine as [`ObjectRef`] (`Arc<dyn DomainObject>`), so a
//! relationship can hand back objects of *different* concrete types. The runtime type
//! name reported by [`DomainObject::type_name`] is what the
//! [`TypeRegistry`](super::TypeRegistry) uses to pick a resource kind.

use crate::framework::error::AccessError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt::Debug;
use std::sync::Arc;

/// Trait that any domain type must implement to be serialized as a JSON:API resource.
///
/// # Architecture Note
/// The engine is written *once* against this trait and works for every domain type.
/// Accessors must be side-effect free: the resolver may call them several times per
/// serialization when include paths overlap.
///
/// # Provided Methods
/// - [`DomainObject::type_name`] defaults to the last path segment of the Rust type name
///   (e.g. `Post` for `my_app::model::Post`).
/// - [`DomainObject::relation`] defaults to "no such member".
pub trait DomainObject: Debug + Send + Sync + 'static {
    /// The runtime type name used for kind resolution.
    ///
    /// Override this when one Rust type stands for several runtime types
    /// (e.g. an enum of vehicle variants).
    fn type_name(&self) -> &str {
        short_type_name(std::any::type_name::<Self>())
    }

    /// The identity of this object. Serialized as the resource `id`.
    fn id(&self) -> String;

    /// Reads a field by name.
    ///
    /// Return `Ok(Value::Null)` for a field that exists but is empty and
    /// [`AccessError::NoSuchMember`] for a field that does not exist at all.
    fn field(&self, name: &str) -> Result<Value, AccessError>;

    /// Fetches related objects by accessor name.
    fn relation(&self, name: &str) -> Result<Related, AccessError> {
        Err(AccessError::no_such_member(self.type_name(), name))
    }
}

/// Shared handle to a domain object of any concrete type.
pub type ObjectRef = Arc<dyn DomainObject>;

/// Objects reachable through one relationship accessor.
#[derive(Debug, Clone)]
pub enum Related {
    /// To-one: at most one object.
    One(Option<ObjectRef>),
    /// To-many: an ordered sequence.
    Many(Vec<ObjectRef>),
}

impl Related {
    pub fn one(object: impl DomainObject) -> Self {
        Related::One(Some(Arc::new(object)))
    }

    pub fn none() -> Self {
        Related::One(None)
    }

    pub fn many<I>(objects: I) -> Self
    where
        I: IntoIterator<Item = ObjectRef>,
    {
        Related::Many(objects.into_iter().collect())
    }

    /// Iterates the related objects in order, whatever the cardinality.
    pub fn iter(&self) -> impl Iterator<Item = &ObjectRef> {
        let (single, multiple) = match self {
            Related::One(object) => (object.as_ref(), &[][..]),
            Related::Many(objects) => (None, objects.as_slice()),
        };
        single.into_iter().chain(multiple.iter())
    }

    pub fn len(&self) -> usize {
        match self {
            Related::One(object) => usize::from(object.is_some()),
            Related::Many(objects) => objects.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<ObjectRef> for Related {
    fn from(object: ObjectRef) -> Self {
        Related::One(Some(object))
    }
}

impl From<Option<ObjectRef>> for Related {
    fn from(object: Option<ObjectRef>) -> Self {
        Related::One(object)
    }
}

impl From<Vec<ObjectRef>> for Related {
    fn from(objects: Vec<ObjectRef>) -> Self {
        Related::Many(objects)
    }
}

/// Opaque key-value bag handed unmodified to every resource instance and override.
///
/// Typical contents are the caller's identity or feature flags. The engine itself
/// never reads it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Context(Map<String, Value>);

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Extracts just the type name (e.g. "Post" instead of "my_app::model::Post<T>").
pub(crate) fn short_type_name(full: &str) -> &str {
    let without_generics = full.split('<').next().unwrap_or(full);
    without_generics.rsplit("::").next().unwrap_or(without_generics)
}
