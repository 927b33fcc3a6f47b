//! Generic JSON:API serialization engine.
//!
//! This module provides the building blocks for turning domain objects into
//! JSON:API documents with compound (`included`) resources.
//!
//! # Main Components
//!
//! - [`DomainObject`] - Trait that domain types implement to be serialized
//! - [`ResourceDescriptor`] - Declarative attributes, meta and relationships of a resource kind
//! - [`ResourceInstance`] - A descriptor bound to one object and a [`Context`]
//! - [`TypeRegistry`] - Runtime type to resource kind resolution
//! - [`InclusionResolver`] - Include path expansion and document assembly
//! - [`SerializeError`], [`DescriptorError`], [`AccessError`] - Error types
//!
//! # Testing
//!
//! See [`mock`] module for a map-backed domain object usable in tests.

pub mod config;
pub mod descriptor;
pub mod error;
pub mod include;
pub mod instance;
pub mod mock;
pub mod object;
pub mod registry;
pub mod resolver;

// Re-export core types for convenience
pub use config::{as_is, KeyFormatter, SerializerConfig};
pub use descriptor::{
    infer_kind, AttributeDefinition, AttributeOptions, Cardinality, MetaAttributeDefinition,
    RelationshipDefinition, ResourceDescriptor, ResourceDescriptorBuilder, ValueSource,
};
pub use error::{AccessError, DescriptorError, SerializeError};
pub use include::{parse_include_paths, IncludePath, IncludeSet};
pub use instance::ResourceInstance;
pub use object::{Context, DomainObject, ObjectRef, Related};
pub use registry::TypeRegistry;
pub use resolver::{Document, InclusionResolver, Primary};
