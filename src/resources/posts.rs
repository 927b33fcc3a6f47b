//! `posts`: a method-backed attribute, meta from both sources, an explicit relationship target.

use crate::framework::{DescriptorError, RelationshipDefinition, ResourceDescriptor};
use crate::model::Post;
use serde_json::{json, Value};

const SUMMARY_LEN: usize = 20;

pub fn posts() -> Result<ResourceDescriptor, DescriptorError> {
    ResourceDescriptor::for_type::<Post>()
        .attributes(["title", "body", "summary"])
        .meta_attribute("word_count")
        .relationship(RelationshipDefinition::to_one("author").class_name("authors"))
        .has_many("comments")
        .has_many("tags")
        .method("summary", |r| {
            let body = r.field("body")?;
            let body = body.as_str().unwrap_or_default();
            Ok(json!(body.chars().take(SUMMARY_LEN).collect::<String>()))
        })
        .meta(|r, mut meta| {
            if let Some(viewer) = r.context().get("viewer") {
                meta.insert("viewer".into(), viewer.clone());
            }
            Ok(Value::Object(meta))
        })
        .build()
}
