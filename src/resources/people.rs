//! `people` and its specialization `authors`.

use crate::framework::{DescriptorError, ResourceDescriptor, SerializeError};
use crate::model::Person;
use serde_json::{json, Value};

/// Any person. `name` is declared before the method that computes it.
pub fn people() -> Result<ResourceDescriptor, DescriptorError> {
    ResourceDescriptor::builder("people")
        .model::<Person>()
        .attributes(["name", "email"])
        .has_many("posts")
        .has_many("vehicles")
        .method("name", |r| {
            let part = |field: &str| -> Result<String, SerializeError> {
                match r.field(field)? {
                    Value::String(s) => Ok(s),
                    _ => Err(SerializeError::member(r.kind(), "name", format!("`{field}` is not a string"))),
                }
            };
            Ok(json!(format!("{} {}", part("first_name")?, part("last_name")?)))
        })
        .build()
}

/// People seen through a post's `author` relationship. Not bound to a runtime type:
/// only reachable through an explicit `class_name`.
pub fn authors(people: &ResourceDescriptor) -> Result<ResourceDescriptor, DescriptorError> {
    ResourceDescriptor::builder("authors")
        .extends(people)
        .attribute_with("byline", |r| {
            let posts = r.related("posts")?.map(|posts| posts.len()).unwrap_or_default();
            Ok(json!(format!("{} post(s)", posts)))
        })
        .build()
}
