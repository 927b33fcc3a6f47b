//! # Inclusion Resolver
//!
//! The entry point of the engine: turns primary objects plus include paths into a
//! JSON:API [`Document`].
//!
//! ## How Includes Are Expanded
//!
//! For each primary object and each include path:
//!
//! 1. Look up the first segment as a relationship of the current kind. Unknown names end
//!    the path quietly; other paths are unaffected.
//! 2. Resolve each related object's kind through the [`TypeRegistry`] (explicit
//!    `class_name` first). Objects with no kind are skipped.
//! 3. Insert the related resource into the [`IncludeSet`] unless its `(type, id)` is
//!    already there.
//! 4. Recurse with the remaining segments *even on a dedup hit*, so a second path can
//!    still reach deeper relationships of an object emitted by a shorter one.
//!
//! Recursion depth is bounded by the number of segments in the path, so cyclic object
//! graphs need no visited-guard.
//!
//! ## Concurrency
//!
//! A [`serialize`](InclusionResolver::serialize) call is synchronous and owns its
//! `IncludeSet`. [`serialize_concurrent`](InclusionResolver::serialize_concurrent) runs
//! each primary object on its own blocking task with a private set and merges the sets
//! by key afterwards, producing the same document as the sequential path.

use crate::framework::config::{as_is, KeyFormatter, SerializerConfig};
use crate::framework::descriptor::Cardinality;
use crate::framework::error::SerializeError;
use crate::framework::include::{parse_include_paths, IncludePath, IncludeSet};
use crate::framework::instance::ResourceInstance;
use crate::framework::object::{Context, ObjectRef};
use crate::framework::registry::TypeRegistry;
use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{debug, instrument, trace};

/// Primary input: one object or an ordered collection.
#[derive(Debug, Clone)]
pub enum Primary {
    One(ObjectRef),
    Many(Vec<ObjectRef>),
}

impl Primary {
    fn len(&self) -> usize {
        match self {
            Primary::One(_) => 1,
            Primary::Many(objects) => objects.len(),
        }
    }
}

impl From<ObjectRef> for Primary {
    fn from(object: ObjectRef) -> Self {
        Primary::One(object)
    }
}

impl From<Vec<ObjectRef>> for Primary {
    fn from(objects: Vec<ObjectRef>) -> Self {
        Primary::Many(objects)
    }
}

/// A top-level JSON:API document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Document {
    pub data: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub included: Option<Vec<Value>>,
}

impl Document {
    fn new(data: Value, included: IncludeSet) -> Self {
        Self {
            data,
            included: (!included.is_empty()).then(|| included.into_values()),
        }
    }
}

/// Serializes domain objects into JSON:API documents.
///
/// Cheap to clone: the registry, configuration and key formatter are shared.
#[derive(Clone)]
pub struct InclusionResolver {
    registry: Arc<TypeRegistry>,
    config: Arc<SerializerConfig>,
    key_formatter: KeyFormatter,
}

impl InclusionResolver {
    pub fn new(registry: TypeRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
            config: Arc::new(SerializerConfig::default()),
            key_formatter: as_is(),
        }
    }

    pub fn with_config(mut self, config: SerializerConfig) -> Self {
        self.config = Arc::new(config);
        self
    }

    /// Installs the key-casing policy applied to attribute, meta and relationship keys.
    pub fn with_key_formatter<F>(mut self, formatter: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.key_formatter = Arc::new(formatter);
        self
    }

    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    pub fn config(&self) -> &SerializerConfig {
        &self.config
    }

    /// Serializes `primary` and everything reachable through `include`.
    ///
    /// Each primary object's kind comes from its runtime type. In a collection, objects
    /// with no registered kind are skipped like unresolvable related objects.
    /// `included` is present in the result only when at least one related resource was found.
    ///
    /// # Errors
    ///
    /// - [`SerializeError::UnregisteredType`] if a single primary object has no registered kind.
    /// - [`SerializeError::InvalidMetaResult`] if a meta override misbehaves.
    /// - [`SerializeError::Access`] if a declared member is missing on an object.
    /// - [`SerializeError::Cardinality`] if a to-one accessor returns a collection.
    pub fn serialize<S: AsRef<str>>(
        &self,
        primary: impl Into<Primary>,
        context: &Context,
        include: &[S],
    ) -> Result<Document, SerializeError> {
        self.serialize_with(primary.into(), None, context, include)
    }

    /// Like [`serialize`](Self::serialize), but every primary object is serialized as
    /// `kind` whatever its runtime type. This is how kinds without a model binding
    /// (e.g. a specialization reached only through `class_name`) become primary data.
    ///
    /// # Errors
    ///
    /// [`SerializeError::UnknownKind`] if `kind` is not registered, otherwise as
    /// [`serialize`](Self::serialize).
    pub fn serialize_as<S: AsRef<str>>(
        &self,
        kind: &str,
        primary: impl Into<Primary>,
        context: &Context,
        include: &[S],
    ) -> Result<Document, SerializeError> {
        if self.registry.get_kind(kind).is_none() {
            return Err(SerializeError::UnknownKind(kind.to_string()));
        }
        self.serialize_with(primary.into(), Some(kind), context, include)
    }

    #[instrument(skip_all, fields(primary_count = primary.len(), kind = ?kind, include = include.len()))]
    fn serialize_with<S: AsRef<str>>(
        &self,
        primary: Primary,
        kind: Option<&str>,
        context: &Context,
        include: &[S],
    ) -> Result<Document, SerializeError> {
        let paths = parse_include_paths(include);
        let mut included = IncludeSet::new();

        let data = match &primary {
            Primary::One(object) => self
                .serialize_primary(object, kind, context, &paths, &mut included)?
                .ok_or_else(|| SerializeError::UnregisteredType(object.type_name().to_string()))?,
            Primary::Many(objects) => {
                let mut resources = Vec::with_capacity(objects.len());
                for object in objects {
                    if let Some(resource) = self.serialize_primary(object, kind, context, &paths, &mut included)? {
                        resources.push(resource);
                    }
                }
                Value::Array(resources)
            }
        };
        debug!(included = included.len(), "Serialized document");
        Ok(Document::new(data, included))
    }

    /// Collection variant of [`serialize`](Self::serialize) that spreads primary objects
    /// over blocking tasks. Requires a Tokio runtime.
    ///
    /// On the first failure the tasks still queued are aborted.
    pub async fn serialize_concurrent<S: AsRef<str>>(
        &self,
        primary: Vec<ObjectRef>,
        context: &Context,
        include: &[S],
    ) -> Result<Document, SerializeError> {
        let paths = Arc::new(parse_include_paths(include));
        let context = Arc::new(context.clone());

        let mut tasks = JoinSet::new();
        for (index, object) in primary.into_iter().enumerate() {
            let resolver = self.clone();
            let paths = paths.clone();
            let context = context.clone();
            tasks.spawn_blocking(move || {
                let mut included = IncludeSet::new();
                let resource = resolver.serialize_primary(&object, None, &context, &paths, &mut included)?;
                Ok::<_, SerializeError>((index, resource, included))
            });
        }

        let mut parts = Vec::with_capacity(tasks.len());
        while let Some(joined) = tasks.join_next().await {
            parts.push(joined.map_err(|e| SerializeError::TaskFailed(e.to_string()))??);
        }
        parts.sort_by_key(|(index, ..)| *index);

        let mut data = Vec::with_capacity(parts.len());
        let mut included = IncludeSet::new();
        for (_, resource, partial) in parts {
            data.extend(resource);
            included.merge(partial);
        }
        debug!(primary_count = data.len(), included = included.len(), "Serialized document concurrently");
        Ok(Document::new(Value::Array(data), included))
    }

    /// Returns `None` when the object has no kind.
    fn serialize_primary(
        &self,
        object: &ObjectRef,
        kind: Option<&str>,
        context: &Context,
        paths: &[IncludePath],
        included: &mut IncludeSet,
    ) -> Result<Option<Value>, SerializeError> {
        let Some(descriptor) = self.registry.resolve(object.as_ref(), kind) else {
            debug!(type_name = object.type_name(), "No resource kind for primary object, skipping");
            return Ok(None);
        };
        let instance = ResourceInstance::new(&descriptor, object, context);
        let resource = self.resource_object(&instance)?;

        for path in paths {
            trace!(kind = instance.kind(), %path, "Expanding include path");
            self.include_segments(&instance, path.segments(), included)?;
        }
        Ok(Some(resource))
    }

    fn include_segments(
        &self,
        instance: &ResourceInstance<'_>,
        segments: &[String],
        included: &mut IncludeSet,
    ) -> Result<(), SerializeError> {
        let Some((name, rest)) = segments.split_first() else {
            return Ok(());
        };
        let Some(relationship) = instance.descriptor().relationship(name) else {
            debug!(kind = instance.kind(), relationship = %name, "Unknown relationship, include path truncated");
            return Ok(());
        };

        let related = instance.fetch(relationship)?;
        for object in related.iter() {
            let Some(descriptor) = self.registry.resolve(object.as_ref(), relationship.target_kind()) else {
                debug!(
                    relationship = %name,
                    type_name = object.type_name(),
                    "No resource kind for related object, skipping"
                );
                continue;
            };
            let child = ResourceInstance::new(&descriptor, object, instance.context());
            let id = child.id()?;
            if included.contains(child.kind(), &id) {
                trace!(kind = child.kind(), %id, "Already included");
            } else {
                let resource = self.resource_object(&child)?;
                included.insert(child.kind(), id, resource);
            }
            self.include_segments(&child, rest, included)?;
        }
        Ok(())
    }

    /// Builds `{type, id, attributes, meta?, relationships?, links?}` for one instance.
    pub fn resource_object(&self, instance: &ResourceInstance<'_>) -> Result<Value, SerializeError> {
        let id = instance.id()?;
        let mut resource = Map::new();
        resource.insert("type".into(), Value::from(instance.kind()));
        resource.insert("id".into(), Value::from(id.as_str()));
        resource.insert("attributes".into(), Value::Object(self.format_keys(instance.attributes()?)));

        let meta = instance.meta()?;
        if !meta.is_empty() {
            resource.insert("meta".into(), Value::Object(self.format_keys(meta)));
        }
        if self.config.include_linkage {
            resource.insert("relationships".into(), Value::Object(self.linkage(instance)?));
        }
        if let Some(link) = self.config.self_link(instance.kind(), &id) {
            let mut links = Map::new();
            links.insert("self".into(), Value::String(link));
            resource.insert("links".into(), Value::Object(links));
        }
        Ok(Value::Object(resource))
    }

    fn linkage(&self, instance: &ResourceInstance<'_>) -> Result<Map<String, Value>, SerializeError> {
        let mut relationships = Map::new();
        for relationship in instance.descriptor().relationships() {
            let related = instance.fetch(relationship)?;
            let mut identifiers = Vec::with_capacity(related.len());
            for object in related.iter() {
                if let Some(descriptor) = self.registry.resolve(object.as_ref(), relationship.target_kind()) {
                    identifiers.push(ResourceInstance::new(&descriptor, object, instance.context()).identifier()?);
                }
            }
            let data = match relationship.cardinality() {
                Cardinality::ToOne => identifiers.into_iter().next().unwrap_or(Value::Null),
                Cardinality::ToMany => Value::Array(identifiers),
            };
            let mut member = Map::new();
            member.insert("data".into(), data);
            relationships.insert((self.key_formatter)(relationship.name()), Value::Object(member));
        }
        Ok(relationships)
    }

    fn format_keys(&self, map: Map<String, Value>) -> Map<String, Value> {
        map.into_iter()
            .map(|(key, value)| ((self.key_formatter)(&key), value))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framework::descriptor::{RelationshipDefinition, ResourceDescriptor};
    use crate::framework::mock::MockObject;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn blog_registry() -> TypeRegistry {
        TypeRegistry::new()
            .with(
                ResourceDescriptor::builder("posts")
                    .model_name("Post")
                    .attribute("title")
                    .has_one("user")
                    .has_many("comments")
                    .build()
                    .unwrap(),
            )
            .with(
                ResourceDescriptor::builder("users")
                    .model_name("User")
                    .attribute("name")
                    .has_many("posts")
                    .build()
                    .unwrap(),
            )
            .with(
                ResourceDescriptor::builder("comments")
                    .model_name("Comment")
                    .attribute("body")
                    .has_one("user")
                    .build()
                    .unwrap(),
            )
    }

    #[test]
    fn test_post_with_user_scenario() {
        let user = MockObject::new("User", 5).field("name", "J").into_ref();
        let post = MockObject::new("Post", 1)
            .field("title", "T")
            .one("user", user)
            .into_ref();
        let resolver = InclusionResolver::new(blog_registry());

        let document = resolver.serialize(post, &Context::new(), &["user"]).unwrap();
        assert_eq!(
            serde_json::to_value(&document).unwrap(),
            json!({
                "data": {"type": "posts", "id": "1", "attributes": {"title": "T"}},
                "included": [{"type": "users", "id": "5", "attributes": {"name": "J"}}]
            })
        );
    }

    #[test]
    fn test_no_include_paths_means_no_included_key() {
        let post = MockObject::new("Post", 1).field("title", "T").into_ref();
        let resolver = InclusionResolver::new(blog_registry());

        let document = resolver.serialize(post, &Context::new(), &[] as &[&str]).unwrap();
        assert!(document.included.is_none());
        assert!(serde_json::to_value(&document).unwrap().get("included").is_none());
    }

    #[test]
    fn test_included_omitted_when_nothing_resolves() {
        let post = MockObject::new("Post", 1).field("title", "T").none("user").into_ref();
        let resolver = InclusionResolver::new(blog_registry());

        let document = resolver.serialize(post, &Context::new(), &["user", "bogus"]).unwrap();
        assert!(document.included.is_none());
    }

    #[test]
    fn test_primary_collection_is_not_deduplicated() {
        let post = MockObject::new("Post", 1).field("title", "T").into_ref();
        let resolver = InclusionResolver::new(blog_registry());

        let document = resolver
            .serialize(vec![post.clone(), post], &Context::new(), &[] as &[&str])
            .unwrap();
        assert_eq!(document.data.as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_dedup_hit_keeps_traversing() {
        // "user" emits the user first; "comments.user.posts" must still reach the posts
        // through the already-included user.
        let user = MockObject::new("User", 5).field("name", "J").into_arc();
        let other_post = MockObject::new("Post", 2).field("title", "Other").into_ref();
        user.link("posts", vec![other_post]);
        let comment = MockObject::new("Comment", 9)
            .field("body", "nice")
            .one("user", user.clone())
            .into_ref();
        let post = MockObject::new("Post", 1)
            .field("title", "T")
            .one("user", user)
            .many("comments", vec![comment])
            .into_ref();
        let resolver = InclusionResolver::new(blog_registry());

        let document = resolver
            .serialize(post, &Context::new(), &["user", "comments.user.posts"])
            .unwrap();
        let keys: Vec<_> = document
            .included
            .unwrap()
            .iter()
            .map(|r| format!("{}:{}", r["type"].as_str().unwrap(), r["id"].as_str().unwrap()))
            .collect();
        assert_eq!(keys, vec!["users:5", "comments:9", "posts:2"]);
    }

    #[test]
    fn test_self_reference_through_primary_is_included() {
        // The primary is reachable from itself; it still lands in `included`.
        let post = MockObject::new("Post", 1).field("title", "T").into_arc();
        let user = MockObject::new("User", 5)
            .field("name", "J")
            .many("posts", vec![post.clone() as ObjectRef])
            .into_ref();
        post.link("user", user);
        let resolver = InclusionResolver::new(blog_registry());

        let document = resolver
            .serialize(post as ObjectRef, &Context::new(), &["user.posts"])
            .unwrap();
        assert_eq!(document.included.unwrap().len(), 2);
    }

    #[test]
    fn test_missing_relation_accessor_propagates() {
        let post = MockObject::new("Post", 1).field("title", "T").into_ref();
        let resolver = InclusionResolver::new(blog_registry());

        let err = resolver.serialize(post, &Context::new(), &["user"]).unwrap_err();
        assert!(matches!(err, SerializeError::Access(_)));
    }

    #[test]
    fn test_unregistered_member_of_primary_collection_is_skipped() {
        let post = MockObject::new("Post", 1).field("title", "T").none("user").into_ref();
        let tag = MockObject::new("Tag", 7).into_ref();
        let resolver = InclusionResolver::new(blog_registry());

        let document = resolver
            .serialize(vec![tag, post], &Context::new(), &["user"])
            .unwrap();
        assert_eq!(
            document.data,
            json!([{"type": "posts", "id": "1", "attributes": {"title": "T"}}])
        );
    }

    #[test]
    fn test_serialize_as_forces_the_primary_kind() {
        let registry = blog_registry().with(
            ResourceDescriptor::builder("writers")
                .attribute("name")
                .has_many("posts")
                .build()
                .unwrap(),
        );
        let post = MockObject::new("Post", 2).field("title", "Other").into_ref();
        let user = MockObject::new("User", 5)
            .field("name", "J")
            .many("posts", vec![post])
            .into_ref();
        let resolver = InclusionResolver::new(registry);

        let document = resolver
            .serialize_as("writers", user.clone(), &Context::new(), &["posts"])
            .unwrap();
        assert_eq!(document.data["type"], json!("writers"));
        assert_eq!(document.included.unwrap()[0]["type"], json!("posts"));

        let err = resolver
            .serialize_as("editors", user, &Context::new(), &[] as &[&str])
            .unwrap_err();
        assert!(matches!(err, SerializeError::UnknownKind(ref k) if k == "editors"));
    }

    #[test]
    fn test_to_one_returning_many_fails_in_both_paths() {
        let first = MockObject::new("User", 5).field("name", "J").into_ref();
        let second = MockObject::new("User", 6).field("name", "K").into_ref();
        let post = MockObject::new("Post", 1)
            .field("title", "T")
            .many("user", vec![first, second])
            .into_ref();

        let included = InclusionResolver::new(blog_registry())
            .serialize(post.clone(), &Context::new(), &["user"])
            .unwrap_err();
        assert!(matches!(included, SerializeError::Cardinality { found: 2, .. }));

        let linked = InclusionResolver::new(blog_registry())
            .with_config(SerializerConfig {
                base_url: None,
                include_linkage: true,
            })
            .serialize(post, &Context::new(), &[] as &[&str])
            .unwrap_err();
        assert!(matches!(linked, SerializeError::Cardinality { found: 2, .. }));
    }

    #[tokio::test]
    async fn test_concurrent_reports_first_failure() {
        let good = MockObject::new("Post", 1).field("title", "A").none("user").into_ref();
        let broken = MockObject::new("Post", 2).into_ref();
        let resolver = InclusionResolver::new(blog_registry());

        let err = resolver
            .serialize_concurrent(vec![good, broken], &Context::new(), &["user"])
            .await
            .unwrap_err();
        assert!(matches!(err, SerializeError::Access(_)));
    }

    #[test]
    fn test_unregistered_primary_is_an_error() {
        let tag = MockObject::new("Tag", 1).into_ref();
        let resolver = InclusionResolver::new(blog_registry());

        let err = resolver.serialize(tag, &Context::new(), &[] as &[&str]).unwrap_err();
        assert!(matches!(err, SerializeError::UnregisteredType(ref t) if t == "Tag"));
    }

    #[test]
    fn test_linkage_links_and_key_formatting() {
        let registry = TypeRegistry::new()
            .with(
                ResourceDescriptor::builder("posts")
                    .model_name("Post")
                    .attribute("title_text")
                    .meta_attribute("view_count")
                    .relationship(RelationshipDefinition::to_one("main_author").relation_name("user"))
                    .has_many("comments")
                    .build()
                    .unwrap(),
            )
            .with(ResourceDescriptor::builder("users").model_name("User").build().unwrap());
        let user = MockObject::new("User", 5).into_ref();
        let stranger = MockObject::new("Robot", 7).into_ref();
        let post = MockObject::new("Post", 1)
            .field("title_text", "T")
            .field("view_count", 3)
            .one("user", user)
            .many("comments", vec![stranger])
            .into_ref();
        let config = SerializerConfig {
            base_url: Some("https://api.test".into()),
            include_linkage: true,
        };
        let resolver = InclusionResolver::new(registry)
            .with_config(config)
            .with_key_formatter(|key| key.replace('_', "-"));

        let document = resolver.serialize(post, &Context::new(), &[] as &[&str]).unwrap();
        assert_eq!(
            document.data,
            json!({
                "type": "posts",
                "id": "1",
                "attributes": {"title-text": "T"},
                "meta": {"view-count": 3},
                "relationships": {
                    "main-author": {"data": {"type": "users", "id": "5"}},
                    "comments": {"data": []}
                },
                "links": {"self": "https://api.test/posts/1"}
            })
        );
    }

    #[tokio::test]
    async fn test_concurrent_matches_sequential() {
        let shared = MockObject::new("User", 5).field("name", "J").into_ref();
        let first = MockObject::new("Post", 1)
            .field("title", "A")
            .one("user", shared.clone())
            .into_ref();
        let second = MockObject::new("Post", 2)
            .field("title", "B")
            .one("user", shared)
            .into_ref();
        let resolver = InclusionResolver::new(blog_registry());
        let context = Context::new();

        let sequential = resolver
            .serialize(vec![first.clone(), second.clone()], &context, &["user"])
            .unwrap();
        let concurrent = resolver
            .serialize_concurrent(vec![first, second], &context, &["user"])
            .await
            .unwrap();
        assert_eq!(sequential, concurrent);
        assert_eq!(concurrent.included.unwrap().len(), 1);
    }
}
