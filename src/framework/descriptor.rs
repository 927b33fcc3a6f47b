//! # Resource Descriptors
//!
//! A [`ResourceDescriptor`] is the declarative description of one resource *kind*
//! (`"posts"`, `"people"`, ...): which attributes it exposes, which meta attributes it
//! reports, which relationships it can traverse and how each value is computed.
//!
//! ## Value Resolution
//!
//! Every attribute (and meta attribute) is resolved through a fixed precedence,
//! highest first:
//!
//! 1. [`ValueSource::Inline`] - a block passed at declaration ([`ResourceDescriptorBuilder::attribute_with`]).
//! 2. [`ValueSource::Options`] - a function passed through [`AttributeOptions`].
//! 3. [`ValueSource::Method`] - a method on the kind with the same name ([`ResourceDescriptorBuilder::method`]).
//! 4. [`ValueSource::Field`] - the same-named field of the domain object.
//!
//! The source is picked once, in [`ResourceDescriptorBuilder::build`], after every
//! declaration is known. A method declared *after* its attribute therefore still wins.
//!
//! ## Inheritance
//!
//! [`ResourceDescriptorBuilder::extends`] copies a parent kind's declarations, methods,
//! meta overrides and relationships into the child. The child adds to them; redefining a
//! method overrides the parent's, redeclaring a member is a [`DescriptorError::DuplicateMember`].

use crate::framework::error::{DescriptorError, SerializeError};
use crate::framework::instance::ResourceInstance;
use crate::framework::object::{short_type_name, DomainObject, Related};
use indexmap::IndexMap;
use serde_json::{Map, Value};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;
use tracing::trace;

/// Computes one attribute or meta value from a bound instance.
pub type ValueFn = Arc<dyn Fn(&ResourceInstance<'_>) -> Result<Value, SerializeError> + Send + Sync>;

/// Computes the objects behind a relationship from a bound instance.
pub type RelationFn = Arc<dyn Fn(&ResourceInstance<'_>) -> Result<Related, SerializeError> + Send + Sync>;

/// One link of a meta override chain. Receives the meta computed so far
/// (the parent's result, or the meta attributes for the root link).
pub type MetaFn =
    Arc<dyn Fn(&ResourceInstance<'_>, Map<String, Value>) -> Result<Value, SerializeError> + Send + Sync>;

/// How an attribute value is obtained.
#[derive(Clone)]
pub enum ValueSource {
    Inline(ValueFn),
    Options(ValueFn),
    Method(ValueFn),
    Field,
}

impl fmt::Debug for ValueSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueSource::Inline(_) => "Inline",
            ValueSource::Options(_) => "Options",
            ValueSource::Method(_) => "Method",
            ValueSource::Field => "Field",
        };
        f.write_str(name)
    }
}

/// A finalized attribute: its name and the strategy chosen for it.
#[derive(Debug, Clone)]
pub struct AttributeDefinition {
    name: String,
    source: ValueSource,
}

/// Meta attributes share the attribute shape; they land in `meta` instead of `attributes`.
pub type MetaAttributeDefinition = AttributeDefinition;

impl AttributeDefinition {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn source(&self) -> &ValueSource {
        &self.source
    }

    pub(crate) fn resolve(&self, instance: &ResourceInstance<'_>) -> Result<Value, SerializeError> {
        match &self.source {
            ValueSource::Inline(f) | ValueSource::Options(f) | ValueSource::Method(f) => f(instance),
            ValueSource::Field => Ok(instance.object().field(&self.name)?),
        }
    }
}

/// Extra settings for an attribute declaration, attached separately from the name.
#[derive(Clone, Default)]
pub struct AttributeOptions {
    value: Option<ValueFn>,
}

impl AttributeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Computes the value with `f` instead of a method or field lookup.
    pub fn value<F>(mut self, f: F) -> Self
    where
        F: Fn(&ResourceInstance<'_>) -> Result<Value, SerializeError> + Send + Sync + 'static,
    {
        self.value = Some(Arc::new(f));
        self
    }
}

/// To-one or to-many.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    ToOne,
    ToMany,
}

/// A named, traversable relationship of a resource kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationshipDefinition {
    name: String,
    cardinality: Cardinality,
    class_name: Option<String>,
    relation_name: Option<String>,
}

impl RelationshipDefinition {
    pub fn to_one(name: impl Into<String>) -> Self {
        Self::new(name, Cardinality::ToOne)
    }

    pub fn to_many(name: impl Into<String>) -> Self {
        Self::new(name, Cardinality::ToMany)
    }

    fn new(name: impl Into<String>, cardinality: Cardinality) -> Self {
        Self {
            name: name.into(),
            cardinality,
            class_name: None,
            relation_name: None,
        }
    }

    /// Forces every related object to serialize as `kind`, whatever its runtime type.
    pub fn class_name(mut self, kind: impl Into<String>) -> Self {
        self.class_name = Some(kind.into());
        self
    }

    /// Reads the related objects through `accessor` instead of the public name.
    pub fn relation_name(mut self, accessor: impl Into<String>) -> Self {
        self.relation_name = Some(accessor.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn cardinality(&self) -> Cardinality {
        self.cardinality
    }

    pub fn target_kind(&self) -> Option<&str> {
        self.class_name.as_deref()
    }

    /// The accessor used on the domain object.
    pub fn accessor(&self) -> &str {
        self.relation_name.as_deref().unwrap_or(&self.name)
    }
}

/// An attribute as declared, before its strategy is chosen.
#[derive(Clone)]
struct AttributeDecl {
    name: String,
    inline: Option<ValueFn>,
    options: Option<ValueFn>,
}

impl AttributeDecl {
    fn finalize(&self, methods: &HashMap<String, ValueFn>) -> AttributeDefinition {
        let source = if let Some(f) = &self.inline {
            ValueSource::Inline(f.clone())
        } else if let Some(f) = &self.options {
            ValueSource::Options(f.clone())
        } else if let Some(f) = methods.get(&self.name) {
            ValueSource::Method(f.clone())
        } else {
            ValueSource::Field
        };
        AttributeDefinition {
            name: self.name.clone(),
            source,
        }
    }
}

/// Declarative description of one resource kind.
///
/// Build one with [`ResourceDescriptor::builder`] or [`ResourceDescriptor::for_type`].
pub struct ResourceDescriptor {
    kind: String,
    model_name: Option<String>,
    primary_key: Option<String>,
    lineage: Vec<String>,
    attribute_decls: Vec<AttributeDecl>,
    meta_decls: Vec<AttributeDecl>,
    methods: HashMap<String, ValueFn>,
    relation_methods: HashMap<String, RelationFn>,
    meta_overrides: Vec<MetaFn>,
    relationships: IndexMap<String, RelationshipDefinition>,
    attributes: Vec<AttributeDefinition>,
    meta_attributes: Vec<MetaAttributeDefinition>,
}

impl fmt::Debug for ResourceDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceDescriptor")
            .field("kind", &self.kind)
            .field("model_name", &self.model_name)
            .field("lineage", &self.lineage)
            .field("attributes", &self.attributes)
            .field("meta_attributes", &self.meta_attributes)
            .field("relationships", &self.relationships.keys().collect::<Vec<_>>())
            .field("meta_overrides", &self.meta_overrides.len())
            .finish()
    }
}

impl ResourceDescriptor {
    /// Starts a descriptor with an explicit kind name.
    pub fn builder(kind: impl Into<String>) -> ResourceDescriptorBuilder {
        ResourceDescriptorBuilder::new(kind.into())
    }

    /// Starts a descriptor bound to `T`, with the kind inferred from `T`'s name
    /// (`BlogPost` becomes `blog_posts`).
    pub fn for_type<T: DomainObject>() -> ResourceDescriptorBuilder {
        let name = short_type_name(std::any::type_name::<T>());
        ResourceDescriptorBuilder::new(infer_kind(name)).model_name(name)
    }

    /// The JSON:API `type`.
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// The runtime type name this kind is registered for, if any.
    pub fn model_name(&self) -> Option<&str> {
        self.model_name.as_deref()
    }

    pub fn primary_key(&self) -> Option<&str> {
        self.primary_key.as_deref()
    }

    pub fn attributes(&self) -> &[AttributeDefinition] {
        &self.attributes
    }

    pub fn meta_attributes(&self) -> &[MetaAttributeDefinition] {
        &self.meta_attributes
    }

    pub(crate) fn meta_overrides(&self) -> &[MetaFn] {
        &self.meta_overrides
    }

    pub(crate) fn relation_method(&self, accessor: &str) -> Option<&RelationFn> {
        self.relation_methods.get(accessor)
    }

    /// Looks up a relationship, inherited ones included.
    pub fn relationship(&self, name: &str) -> Option<&RelationshipDefinition> {
        self.relationships.get(name)
    }

    pub fn relationships(&self) -> impl Iterator<Item = &RelationshipDefinition> {
        self.relationships.values()
    }

    /// Kind names from the root of the hierarchy down to this kind.
    pub fn lineage(&self) -> &[String] {
        &self.lineage
    }

    /// True if this kind is `kind` or specializes it.
    pub fn is_a(&self, kind: &str) -> bool {
        self.lineage.iter().any(|k| k == kind)
    }
}

/// Collects declarations for a [`ResourceDescriptor`].
///
/// Declarations can come in any order; [`build`](Self::build) picks each attribute's
/// value source once everything is known.
#[must_use]
pub struct ResourceDescriptorBuilder {
    kind: String,
    model_name: Option<String>,
    primary_key: Option<String>,
    lineage: Vec<String>,
    attribute_decls: Vec<AttributeDecl>,
    meta_decls: Vec<AttributeDecl>,
    methods: HashMap<String, ValueFn>,
    relation_methods: HashMap<String, RelationFn>,
    meta_overrides: Vec<MetaFn>,
    relationships: Vec<RelationshipDefinition>,
}

impl ResourceDescriptorBuilder {
    fn new(kind: String) -> Self {
        Self {
            kind,
            model_name: None,
            primary_key: None,
            lineage: Vec::new(),
            attribute_decls: Vec::new(),
            meta_decls: Vec::new(),
            methods: HashMap::new(),
            relation_methods: HashMap::new(),
            meta_overrides: Vec::new(),
            relationships: Vec::new(),
        }
    }

    /// Inherits everything `parent` declares. Parent members come first in output order,
    /// methods defined on this builder take precedence over the parent's.
    pub fn extends(mut self, parent: &ResourceDescriptor) -> Self {
        let mut attribute_decls = parent.attribute_decls.clone();
        attribute_decls.append(&mut self.attribute_decls);
        self.attribute_decls = attribute_decls;

        let mut meta_decls = parent.meta_decls.clone();
        meta_decls.append(&mut self.meta_decls);
        self.meta_decls = meta_decls;

        for (name, f) in &parent.methods {
            self.methods.entry(name.clone()).or_insert_with(|| f.clone());
        }
        for (name, f) in &parent.relation_methods {
            self.relation_methods.entry(name.clone()).or_insert_with(|| f.clone());
        }

        let mut meta_overrides = parent.meta_overrides.clone();
        meta_overrides.append(&mut self.meta_overrides);
        self.meta_overrides = meta_overrides;

        let mut relationships: Vec<_> = parent.relationships.values().cloned().collect();
        relationships.append(&mut self.relationships);
        self.relationships = relationships;

        if self.primary_key.is_none() {
            self.primary_key = parent.primary_key.clone();
        }
        self.lineage = parent.lineage.clone();
        self
    }

    /// Binds the kind to a runtime type name for registry lookups.
    pub fn model_name(mut self, name: impl Into<String>) -> Self {
        self.model_name = Some(name.into());
        self
    }

    /// Binds the kind to `T`'s runtime type name.
    pub fn model<T: DomainObject>(self) -> Self {
        self.model_name(short_type_name(std::any::type_name::<T>()))
    }

    /// Serializes `id` from this field instead of [`DomainObject::id`].
    pub fn primary_key(mut self, field: impl Into<String>) -> Self {
        self.primary_key = Some(field.into());
        self
    }

    pub fn attribute(mut self, name: impl Into<String>) -> Self {
        self.attribute_decls.push(AttributeDecl {
            name: name.into(),
            inline: None,
            options: None,
        });
        self
    }

    pub fn attributes<I, S>(self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        names.into_iter().fold(self, |builder, name| builder.attribute(name))
    }

    /// Declares an attribute computed by an inline block.
    pub fn attribute_with<F>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&ResourceInstance<'_>) -> Result<Value, SerializeError> + Send + Sync + 'static,
    {
        self.attribute_decls.push(AttributeDecl {
            name: name.into(),
            inline: Some(Arc::new(f)),
            options: None,
        });
        self
    }

    pub fn attribute_opts(mut self, name: impl Into<String>, options: AttributeOptions) -> Self {
        self.attribute_decls.push(AttributeDecl {
            name: name.into(),
            inline: None,
            options: options.value,
        });
        self
    }

    pub fn meta_attribute(mut self, name: impl Into<String>) -> Self {
        self.meta_decls.push(AttributeDecl {
            name: name.into(),
            inline: None,
            options: None,
        });
        self
    }

    pub fn meta_attribute_with<F>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&ResourceInstance<'_>) -> Result<Value, SerializeError> + Send + Sync + 'static,
    {
        self.meta_decls.push(AttributeDecl {
            name: name.into(),
            inline: Some(Arc::new(f)),
            options: None,
        });
        self
    }

    pub fn meta_attribute_opts(mut self, name: impl Into<String>, options: AttributeOptions) -> Self {
        self.meta_decls.push(AttributeDecl {
            name: name.into(),
            inline: None,
            options: options.value,
        });
        self
    }

    /// Defines a method on the kind. Used by any attribute or meta attribute of the
    /// same name that has no block or options override.
    pub fn method<F>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&ResourceInstance<'_>) -> Result<Value, SerializeError> + Send + Sync + 'static,
    {
        self.methods.insert(name.into(), Arc::new(f));
        self
    }

    /// Defines a relationship accessor on the kind, used instead of the domain object's.
    pub fn relation_method<F>(mut self, accessor: impl Into<String>, f: F) -> Self
    where
        F: Fn(&ResourceInstance<'_>) -> Result<Related, SerializeError> + Send + Sync + 'static,
    {
        self.relation_methods.insert(accessor.into(), Arc::new(f));
        self
    }

    /// Adds a meta override. It receives the meta computed so far (the parent's
    /// override result, or the meta attributes) and must return an object.
    pub fn meta<F>(mut self, f: F) -> Self
    where
        F: Fn(&ResourceInstance<'_>, Map<String, Value>) -> Result<Value, SerializeError> + Send + Sync + 'static,
    {
        self.meta_overrides.push(Arc::new(f));
        self
    }

    pub fn has_one(self, name: impl Into<String>) -> Self {
        self.relationship(RelationshipDefinition::to_one(name))
    }

    pub fn has_many(self, name: impl Into<String>) -> Self {
        self.relationship(RelationshipDefinition::to_many(name))
    }

    pub fn relationship(mut self, relationship: RelationshipDefinition) -> Self {
        self.relationships.push(relationship);
        self
    }

    /// Finalizes the descriptor.
    ///
    /// # Errors
    ///
    /// - [`DescriptorError::EmptyKind`] if the kind name is blank.
    /// - [`DescriptorError::DuplicateMember`] if an attribute or relationship name is
    ///   declared twice (inherited members included), or a meta attribute is.
    /// - [`DescriptorError::ReservedMember`] for attributes or relationships named
    ///   `id` or `type`.
    pub fn build(self) -> Result<ResourceDescriptor, DescriptorError> {
        if self.kind.trim().is_empty() {
            return Err(DescriptorError::EmptyKind);
        }

        // Attributes and relationships share the resource's field namespace.
        let mut fields = HashSet::new();
        let field_names = self
            .attribute_decls
            .iter()
            .map(|decl| decl.name.as_str())
            .chain(self.relationships.iter().map(|rel| rel.name()));
        for name in field_names {
            if name == "id" || name == "type" {
                return Err(DescriptorError::ReservedMember {
                    kind: self.kind.clone(),
                    member: name.to_string(),
                });
            }
            if !fields.insert(name) {
                return Err(self.duplicate(name));
            }
        }

        let mut meta_names = HashSet::new();
        for decl in &self.meta_decls {
            if !meta_names.insert(decl.name.as_str()) {
                return Err(self.duplicate(&decl.name));
            }
        }

        let attributes = self
            .attribute_decls
            .iter()
            .map(|decl| decl.finalize(&self.methods))
            .collect::<Vec<_>>();
        let meta_attributes = self
            .meta_decls
            .iter()
            .map(|decl| decl.finalize(&self.methods))
            .collect::<Vec<_>>();
        trace!(kind = %self.kind, attributes = attributes.len(), meta = meta_attributes.len(), "Descriptor finalized");

        let mut lineage = self.lineage;
        lineage.push(self.kind.clone());

        Ok(ResourceDescriptor {
            kind: self.kind,
            model_name: self.model_name,
            primary_key: self.primary_key,
            lineage,
            attribute_decls: self.attribute_decls,
            meta_decls: self.meta_decls,
            methods: self.methods,
            relation_methods: self.relation_methods,
            meta_overrides: self.meta_overrides,
            relationships: self
                .relationships
                .into_iter()
                .map(|rel| (rel.name().to_string(), rel))
                .collect(),
            attributes,
            meta_attributes,
        })
    }

    fn duplicate(&self, member: &str) -> DescriptorError {
        DescriptorError::DuplicateMember {
            kind: self.kind.clone(),
            member: member.to_string(),
        }
    }
}

/// `BlogPost` -> `blog_posts`.
pub fn infer_kind(type_name: &str) -> String {
    pluralize(&snake_case(type_name))
}

fn snake_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    let mut prev_lower = false;
    for c in name.chars() {
        if c.is_uppercase() {
            if prev_lower {
                out.push('_');
            }
            out.extend(c.to_lowercase());
            prev_lower = false;
        } else {
            out.push(c);
            prev_lower = c.is_lowercase() || c.is_ascii_digit();
        }
    }
    out
}

fn pluralize(word: &str) -> String {
    let ends_with_consonant_y = word.ends_with('y')
        && !word
            .chars()
            .rev()
            .nth(1)
            .is_some_and(|c| matches!(c, 'a' | 'e' | 'i' | 'o' | 'u'));
    if ends_with_consonant_y {
        format!("{}ies", &word[..word.len() - 1])
    } else if ["s", "x", "z", "ch", "sh"].iter().any(|suffix| word.ends_with(suffix)) {
        format!("{word}es")
    } else {
        format!("{word}s")
    }
}
