use crate::framework::{AccessError, DomainObject, ObjectRef, Related};
use crate::model::{Comment, Person, Tag};
use serde_json::{json, Value};
use std::sync::{Arc, Weak};

/// A published blog post.
///
/// # Serialization
/// Implements [`DomainObject`] and serializes as a `posts` resource with `author`,
/// `comments` and `tags` relationships.
#[derive(Debug)]
pub struct Post {
    pub id: u64,
    pub title: String,
    pub body: String,
    pub author: Arc<Person>,
    pub tags: Vec<Arc<Tag>>,
    pub comments: Vec<Arc<Comment>>,
}

/// Payload for publishing a post.
#[derive(Debug, Clone)]
pub struct PostCreate {
    pub title: String,
    pub body: String,
    pub tags: Vec<Arc<Tag>>,
    /// `(comment id, commenter, body)`
    pub comments: Vec<(u64, Arc<Person>, String)>,
}

impl Post {
    /// Publishes a post. Comments are created pointing back at the new post.
    pub fn publish(id: u64, author: Arc<Person>, params: PostCreate) -> Arc<Self> {
        Arc::new_cyclic(|me: &Weak<Post>| Self {
            id,
            title: params.title,
            body: params.body,
            author,
            tags: params.tags,
            comments: params
                .comments
                .into_iter()
                .map(|(comment_id, commenter, body)| Arc::new(Comment::new(comment_id, body, commenter, me.clone())))
                .collect(),
        })
    }

    pub fn word_count(&self) -> usize {
        self.body.split_whitespace().count()
    }
}

impl DomainObject for Post {
    fn id(&self) -> String {
        self.id.to_string()
    }

    fn field(&self, name: &str) -> Result<Value, AccessError> {
        match name {
            "title" => Ok(json!(self.title)),
            "body" => Ok(json!(self.body)),
            "word_count" => Ok(json!(self.word_count())),
            _ => Err(AccessError::no_such_member(self.type_name(), name)),
        }
    }

    fn relation(&self, name: &str) -> Result<Related, AccessError> {
        match name {
            "author" => Ok(Related::One(Some(self.author.clone() as ObjectRef))),
            "tags" => Ok(Related::many(self.tags.iter().map(|t| t.clone() as ObjectRef))),
            "comments" => Ok(Related::many(self.comments.iter().map(|c| c.clone() as ObjectRef))),
            _ => Err(AccessError::no_such_member(self.type_name(), name)),
        }
    }
}
