use crate::framework::{Context, DescriptorError, Document, InclusionResolver, ObjectRef, SerializeError, SerializerConfig};
use crate::model::Blog;
use crate::resources;
use tracing::{debug, info};

/// The sample blog wired to a ready-to-use [`InclusionResolver`].
///
/// `BlogCatalog` is responsible for:
/// - **Registration**: Building every descriptor from [`resources`] into one registry
/// - **Ownership**: Keeping the [`Blog`] alive so weak back-references stay valid
/// - **Entry points**: Serializing posts and people by id
///
/// # Example
///
/// ```ignore
/// let catalog = BlogCatalog::new()?;
/// let document = catalog.post_document(1, &Context::new(), &["author", "comments.commenter"])?;
/// println!("{}", serde_json::to_string_pretty(&document)?);
/// ```
pub struct BlogCatalog {
    /// Resolver over every sample kind.
    pub resolver: InclusionResolver,

    /// The data set being served.
    pub blog: Blog,
}

impl BlogCatalog {
    /// Creates a catalog with the default [`SerializerConfig`].
    pub fn new() -> Result<Self, DescriptorError> {
        Self::with_config(SerializerConfig::default())
    }

    pub fn with_config(config: SerializerConfig) -> Result<Self, DescriptorError> {
        let registry = resources::registry()?;
        info!(kinds = registry.len(), "Resource kinds registered");
        Ok(Self {
            resolver: InclusionResolver::new(registry).with_config(config),
            blog: Blog::sample(),
        })
    }

    /// Serializes one post. An unknown id yields `data: null`.
    pub fn post_document<S: AsRef<str>>(
        &self,
        id: u64,
        context: &Context,
        include: &[S],
    ) -> Result<Document, SerializeError> {
        debug!(post_id = id, "post_document called");
        match self.blog.post(id) {
            Some(post) => self.resolver.serialize(post as ObjectRef, context, include),
            None => Ok(Document {
                data: serde_json::Value::Null,
                included: None,
            }),
        }
    }

    /// Serializes one person as an `authors` resource. An unknown id yields `data: null`.
    pub fn author_document<S: AsRef<str>>(
        &self,
        id: u64,
        context: &Context,
        include: &[S],
    ) -> Result<Document, SerializeError> {
        debug!(person_id = id, "author_document called");
        match self.blog.person(id) {
            Some(person) => self.resolver.serialize_as("authors", person as ObjectRef, context, include),
            None => Ok(Document {
                data: serde_json::Value::Null,
                included: None,
            }),
        }
    }

    /// Serializes every post, in publication order.
    pub fn posts_document<S: AsRef<str>>(&self, context: &Context, include: &[S]) -> Result<Document, SerializeError> {
        self.resolver.serialize(self.posts(), context, include)
    }

    /// Same as [`posts_document`](Self::posts_document), one blocking task per post.
    pub async fn posts_document_concurrent<S: AsRef<str>>(
        &self,
        context: &Context,
        include: &[S],
    ) -> Result<Document, SerializeError> {
        self.resolver.serialize_concurrent(self.posts(), context, include).await
    }

    /// Serializes every person.
    pub fn people_document<S: AsRef<str>>(&self, context: &Context, include: &[S]) -> Result<Document, SerializeError> {
        let people: Vec<ObjectRef> = self.blog.people.iter().map(|p| p.clone() as ObjectRef).collect();
        self.resolver.serialize(people, context, include)
    }

    fn posts(&self) -> Vec<ObjectRef> {
        self.blog.posts.iter().map(|p| p.clone() as ObjectRef).collect()
    }
}
