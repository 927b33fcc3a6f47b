use crate::framework::{DescriptorError, RelationshipDefinition, ResourceDescriptor};
use crate::model::Comment;

/// `comments`. The commenter is exposed under a different name than the accessor.
pub fn comments() -> Result<ResourceDescriptor, DescriptorError> {
    ResourceDescriptor::for_type::<Comment>()
        .attribute("body")
        .relationship(RelationshipDefinition::to_one("commenter").relation_name("author"))
        .has_one("post")
        .build()
}
