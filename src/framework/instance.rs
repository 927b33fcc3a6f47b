//! A [`ResourceDescriptor`] bound to one domain object and a context.

use crate::framework::descriptor::{AttributeDefinition, Cardinality, RelationshipDefinition, ResourceDescriptor};
use crate::framework::error::SerializeError;
use crate::framework::object::{Context, DomainObject, ObjectRef, Related};
use serde_json::{json, Map, Value};
use tracing::warn;

/// One resource ready to be serialized.
///
/// Instances are cheap views: they borrow the descriptor, the object and the context,
/// live for a single serialization call and cache nothing.
pub struct ResourceInstance<'a> {
    descriptor: &'a ResourceDescriptor,
    object: &'a ObjectRef,
    context: &'a Context,
}

impl<'a> ResourceInstance<'a> {
    pub fn new(descriptor: &'a ResourceDescriptor, object: &'a ObjectRef, context: &'a Context) -> Self {
        Self {
            descriptor,
            object,
            context,
        }
    }

    pub fn descriptor(&self) -> &'a ResourceDescriptor {
        self.descriptor
    }

    pub fn object(&self) -> &'a dyn DomainObject {
        self.object.as_ref()
    }

    pub fn object_ref(&self) -> &'a ObjectRef {
        self.object
    }

    pub fn context(&self) -> &'a Context {
        self.context
    }

    /// The JSON:API `type`.
    pub fn kind(&self) -> &'a str {
        self.descriptor.kind()
    }

    /// The JSON:API `id`: the object's identity, or its primary key field as a string.
    pub fn id(&self) -> Result<String, SerializeError> {
        match self.descriptor.primary_key() {
            None => Ok(self.object.id()),
            Some(field) => Ok(match self.object.field(field)? {
                Value::String(s) => s,
                other => other.to_string(),
            }),
        }
    }

    /// Reads a raw field off the bound object.
    pub fn field(&self, name: &str) -> Result<Value, SerializeError> {
        Ok(self.object.field(name)?)
    }

    /// `{ "type": ..., "id": ... }`
    pub fn identifier(&self) -> Result<Value, SerializeError> {
        Ok(json!({ "type": self.kind(), "id": self.id()? }))
    }

    /// Attribute values in declaration order.
    pub fn attributes(&self) -> Result<Map<String, Value>, SerializeError> {
        self.resolve_all(self.descriptor.attributes())
    }

    /// Meta attributes, then each meta override in lineage order.
    ///
    /// # Errors
    ///
    /// [`SerializeError::InvalidMetaResult`] if an override returns anything but an object.
    pub fn meta(&self) -> Result<Map<String, Value>, SerializeError> {
        let mut meta = self.resolve_all(self.descriptor.meta_attributes())?;
        for link in self.descriptor.meta_overrides() {
            meta = match link(self, meta)? {
                Value::Object(map) => map,
                other => {
                    let found = describe(&other);
                    warn!(kind = self.kind(), %found, "Meta override returned a non-object");
                    return Err(SerializeError::InvalidMetaResult {
                        kind: self.kind().to_string(),
                        found,
                    });
                }
            };
        }
        Ok(meta)
    }

    /// Fetches the objects behind a declared relationship.
    /// Returns `None` if this kind has no relationship called `name`.
    pub fn related(&self, name: &str) -> Result<Option<Related>, SerializeError> {
        match self.descriptor.relationship(name) {
            Some(relationship) => self.fetch(relationship).map(Some),
            None => Ok(None),
        }
    }

    /// Related objects shaped by the declared cardinality: a to-many relationship always
    /// yields [`Related::Many`], a to-one relationship at most one object.
    ///
    /// # Errors
    ///
    /// [`SerializeError::Cardinality`] if a to-one accessor returns more than one object.
    pub(crate) fn fetch(&self, relationship: &RelationshipDefinition) -> Result<Related, SerializeError> {
        let accessor = relationship.accessor();
        let related = match self.descriptor.relation_method(accessor) {
            Some(f) => f(self)?,
            None => self.object.relation(accessor)?,
        };
        match (relationship.cardinality(), related) {
            (Cardinality::ToMany, Related::One(object)) => Ok(Related::Many(object.into_iter().collect())),
            (Cardinality::ToOne, Related::Many(objects)) if objects.len() > 1 => Err(SerializeError::Cardinality {
                kind: self.kind().to_string(),
                relationship: relationship.name().to_string(),
                found: objects.len(),
            }),
            (Cardinality::ToOne, Related::Many(objects)) => Ok(Related::One(objects.into_iter().next())),
            (_, related) => Ok(related),
        }
    }

    fn resolve_all(&self, definitions: &[AttributeDefinition]) -> Result<Map<String, Value>, SerializeError> {
        definitions
            .iter()
            .map(|definition| Ok((definition.name().to_string(), definition.resolve(self)?)))
            .collect()
    }
}

fn describe(value: &Value) -> String {
    let shape = match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    };
    format!("{shape} ({value})")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framework::error::AccessError;
    use crate::framework::mock::MockObject;
    use serde_json::json;

    fn post() -> ObjectRef {
        MockObject::new("Post", 1)
            .field("title", "T")
            .field("body", "Hello")
            .field("slug", "hello-world")
            .field("views", 10)
            .into_ref()
    }

    #[test]
    fn test_raw_fields_without_overrides() {
        let descriptor = ResourceDescriptor::builder("posts")
            .attributes(["title", "body", "views"])
            .build()
            .unwrap();
        let object = post();
        let context = Context::new();
        let instance = ResourceInstance::new(&descriptor, &object, &context);

        let attrs = instance.attributes().unwrap();
        for name in ["title", "body", "views"] {
            assert_eq!(attrs[name], object.field(name).unwrap());
        }
        assert_eq!(attrs.keys().collect::<Vec<_>>(), vec!["title", "body", "views"]);
        assert_eq!(instance.id().unwrap(), "1");
        assert_eq!(instance.kind(), "posts");
        assert_eq!(instance.identifier().unwrap(), json!({"type": "posts", "id": "1"}));
    }

    #[test]
    fn test_primary_key_field() {
        let descriptor = ResourceDescriptor::builder("posts").primary_key("slug").build().unwrap();
        let numeric = ResourceDescriptor::builder("posts").primary_key("views").build().unwrap();
        let object = post();
        let context = Context::new();
        assert_eq!(ResourceInstance::new(&descriptor, &object, &context).id().unwrap(), "hello-world");
        assert_eq!(ResourceInstance::new(&numeric, &object, &context).id().unwrap(), "10");
    }

    #[test]
    fn test_missing_field_propagates() {
        let descriptor = ResourceDescriptor::builder("posts").attribute("missing").build().unwrap();
        let object = post();
        let context = Context::new();
        let err = ResourceInstance::new(&descriptor, &object, &context)
            .attributes()
            .unwrap_err();
        assert!(matches!(
            err,
            SerializeError::Access(AccessError::NoSuchMember { ref member, .. }) if member == "missing"
        ));
    }

    #[test]
    fn test_overrides_see_object_and_context() {
        let descriptor = ResourceDescriptor::builder("posts")
            .attribute_with("viewer", |r| Ok(r.context().get("viewer").cloned().unwrap_or(Value::Null)))
            .attribute("shout")
            .method("shout", |r| {
                let title = r.field("title")?;
                Ok(json!(title.as_str().unwrap_or_default().to_uppercase()))
            })
            .build()
            .unwrap();
        let object = post();
        let context = Context::new().with("viewer", "ana");
        let attrs = ResourceInstance::new(&descriptor, &object, &context).attributes().unwrap();
        assert_eq!(attrs["viewer"], json!("ana"));
        assert_eq!(attrs["shout"], json!("T"));
    }

    #[test]
    fn test_meta_empty_without_sources() {
        let descriptor = ResourceDescriptor::builder("posts").build().unwrap();
        let object = post();
        let context = Context::new();
        assert!(ResourceInstance::new(&descriptor, &object, &context).meta().unwrap().is_empty());
    }

    #[test]
    fn test_meta_override_only_is_returned_as_is() {
        let descriptor = ResourceDescriptor::builder("posts")
            .meta(|_, _| Ok(json!({"fresh": true})))
            .build()
            .unwrap();
        let object = post();
        let context = Context::new();
        let meta = ResourceInstance::new(&descriptor, &object, &context).meta().unwrap();
        assert_eq!(Value::Object(meta), json!({"fresh": true}));
    }

    #[test]
    fn test_meta_chain_composes_up_the_lineage() {
        let base = ResourceDescriptor::builder("vehicles")
            .meta_attribute("views")
            .meta(|_, mut meta| {
                meta.insert("level".into(), json!("base"));
                meta.insert("base".into(), json!(true));
                Ok(Value::Object(meta))
            })
            .build()
            .unwrap();
        let child = ResourceDescriptor::builder("cars")
            .extends(&base)
            .meta(|r, mut meta| {
                meta.insert("level".into(), json!(r.kind()));
                Ok(Value::Object(meta))
            })
            .build()
            .unwrap();
        let object = post();
        let context = Context::new();

        let meta = ResourceInstance::new(&child, &object, &context).meta().unwrap();
        assert_eq!(Value::Object(meta), json!({"views": 10, "level": "cars", "base": true}));

        let meta = ResourceInstance::new(&base, &object, &context).meta().unwrap();
        assert_eq!(Value::Object(meta), json!({"views": 10, "level": "base", "base": true}));
    }

    #[test]
    fn test_meta_override_can_replace() {
        let descriptor = ResourceDescriptor::builder("posts")
            .meta_attribute("views")
            .meta(|_, _| Ok(json!({"replaced": 1})))
            .build()
            .unwrap();
        let object = post();
        let context = Context::new();
        let meta = ResourceInstance::new(&descriptor, &object, &context).meta().unwrap();
        assert_eq!(Value::Object(meta), json!({"replaced": 1}));
    }

    #[test]
    fn test_meta_override_must_return_object() {
        let descriptor = ResourceDescriptor::builder("posts")
            .meta(|_, _| Ok(json!("not a map")))
            .build()
            .unwrap();
        let object = post();
        let context = Context::new();
        let err = ResourceInstance::new(&descriptor, &object, &context).meta().unwrap_err();
        match &err {
            SerializeError::InvalidMetaResult { kind, found } => {
                assert_eq!(kind, "posts");
                assert!(found.contains("a string"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(err.to_string().contains("posts"));
    }

    #[test]
    fn test_related_uses_indirection_and_methods() {
        let author: ObjectRef = MockObject::new("Person", 5).into_ref();
        let object: ObjectRef = MockObject::new("Post", 1).one("writer", author).into_ref();
        let descriptor = ResourceDescriptor::builder("posts")
            .relationship(crate::framework::RelationshipDefinition::to_one("author").relation_name("writer"))
            .has_many("siblings")
            .relation_method("siblings", |r| Ok(Related::many(vec![r.object_ref().clone()])))
            .build()
            .unwrap();
        let context = Context::new();
        let instance = ResourceInstance::new(&descriptor, &object, &context);

        let author = instance.related("author").unwrap().unwrap();
        assert_eq!(author.iter().map(|o| o.id()).collect::<Vec<_>>(), vec!["5"]);

        let siblings = instance.related("siblings").unwrap().unwrap();
        assert_eq!(siblings.len(), 1);

        assert!(instance.related("nothing").unwrap().is_none());
    }

    #[test]
    fn test_fetch_follows_declared_cardinality() {
        let a: ObjectRef = MockObject::new("Person", 1).into_ref();
        let b: ObjectRef = MockObject::new("Person", 2).into_ref();
        let object: ObjectRef = MockObject::new("Post", 1)
            .many("editors", vec![a.clone(), b])
            .many("reviewers", vec![a.clone()])
            .one("owner", a)
            .into_ref();
        let descriptor = ResourceDescriptor::builder("posts")
            .has_one("editors")
            .has_one("reviewers")
            .has_many("owner")
            .build()
            .unwrap();
        let context = Context::new();
        let instance = ResourceInstance::new(&descriptor, &object, &context);

        let err = instance.related("editors").unwrap_err();
        assert!(matches!(
            err,
            SerializeError::Cardinality { ref relationship, found: 2, .. } if relationship == "editors"
        ));
        assert!(matches!(instance.related("reviewers").unwrap(), Some(Related::One(Some(_)))));
        assert!(matches!(instance.related("owner").unwrap(), Some(Related::Many(ref v)) if v.len() == 1));
    }
}
