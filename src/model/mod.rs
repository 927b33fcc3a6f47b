//! Sample domain types implementing the [`DomainObject`](crate::framework::DomainObject) trait.

pub mod blog;
pub mod comment;
pub mod person;
pub mod post;
pub mod tag;
pub mod vehicle;

pub use blog::*;
pub use comment::*;
pub use person::*;
pub use post::*;
pub use tag::*;
pub use vehicle::*;
