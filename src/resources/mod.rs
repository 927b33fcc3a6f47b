//! Resource descriptors for the [`model`](crate::model) types.
//!
//! Each submodule declares one kind (or one hierarchy of kinds). [`registry`] wires
//! them all into a [`TypeRegistry`].

pub mod comments;
pub mod people;
pub mod posts;
pub mod tags;
pub mod vehicles;

use crate::framework::{DescriptorError, TypeRegistry};

/// Registers every sample kind.
///
/// | kind | runtime type |
/// |---|---|
/// | `people` | `Person` |
/// | `authors` | - (via `posts.author`) |
/// | `posts` | `Post` |
/// | `comments` | `Comment` |
/// | `tags` | `Tag` |
/// | `vehicles` | - (base kind) |
/// | `cars` | `Car` |
/// | `boats` | `Boat` |
pub fn registry() -> Result<TypeRegistry, DescriptorError> {
    let mut registry = TypeRegistry::new();

    let people = registry.register(people::people()?);
    registry.register(people::authors(&people)?);
    registry.register(posts::posts()?);
    registry.register(comments::comments()?);
    registry.register(tags::tags()?);

    let vehicles = registry.register(vehicles::vehicles()?);
    registry.register(vehicles::cars(&vehicles)?);
    registry.register(vehicles::boats(&vehicles)?);

    Ok(registry)
}
