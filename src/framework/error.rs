//! # Framework Errors
//!
//! This module defines the error types used throughout the serialization engine.
//!
//! Errors are split by *when* they can happen:
//!
//! - [`AccessError`]: the domain object could not answer a field or relationship lookup.
//! - [`DescriptorError`]: a [`ResourceDescriptor`](super::ResourceDescriptor) could not be finalized.
//! - [`SerializeError`]: a single `serialize` call failed.
//!
//! Data-shape ambiguities (unknown relationship names in an include path, related objects
//! with no registered kind) are **not** errors. The resolver drops them and keeps going.

/// Failure reported by a [`DomainObject`](super::DomainObject) accessor.
///
/// A missing member is different from a member whose value is `null`: the former
/// is a configuration mismatch and surfaces to the caller, the latter serializes as `null`.
#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum AccessError {
    #[error("{type_name} has no member named `{member}`")]
    NoSuchMember { type_name: String, member: String },
}

impl AccessError {
    pub fn no_such_member(type_name: impl Into<String>, member: impl Into<String>) -> Self {
        AccessError::NoSuchMember {
            type_name: type_name.into(),
            member: member.into(),
        }
    }
}

/// Errors raised while finalizing a resource descriptor.
#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum DescriptorError {
    /// Attributes and relationships share one namespace per kind, inherited members
    /// included. Meta attributes have their own.
    #[error("Resource kind `{kind}` declares `{member}` more than once")]
    DuplicateMember { kind: String, member: String },

    #[error("Resource kind `{kind}` cannot declare reserved member `{member}`")]
    ReservedMember { kind: String, member: String },

    #[error("Resource kind name must not be empty")]
    EmptyKind,
}

/// Errors that abort a single serialization call.
#[derive(Debug, thiserror::Error)]
pub enum SerializeError {
    /// A meta override produced something other than a JSON object.
    #[error("Meta override for resource kind `{kind}` must return an object, got {found}")]
    InvalidMetaResult { kind: String, found: String },

    #[error(transparent)]
    Access(#[from] AccessError),

    /// A primary object whose runtime type has no registered resource kind.
    #[error("No resource kind registered for type `{0}`")]
    UnregisteredType(String),

    /// A kind requested by name that was never registered.
    #[error("Unknown resource kind `{0}`")]
    UnknownKind(String),

    /// A to-one relationship whose accessor returned a collection.
    #[error("Relationship `{relationship}` of resource kind `{kind}` is to-one but returned {found} objects")]
    Cardinality {
        kind: String,
        relationship: String,
        found: usize,
    },

    /// An attribute or relationship override function reported a failure.
    #[error("Resource kind `{kind}` failed to compute `{member}`: {message}")]
    Member {
        kind: String,
        member: String,
        message: String,
    },

    #[error("Invalid serializer configuration: {0}")]
    InvalidConfig(String),

    #[error("Serialization task failed: {0}")]
    TaskFailed(String),
}

impl SerializeError {
    /// Builds a [`SerializeError::Member`] from inside an override function.
    pub fn member(kind: impl Into<String>, member: impl Into<String>, message: impl Into<String>) -> Self {
        SerializeError::Member {
            kind: kind.into(),
            member: member.into(),
            message: message.into(),
        }
    }
}
