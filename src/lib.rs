#![doc(html_logo_url = "https://www.rust-lang.org/logos/rust-logo-128x128.png")]
#![doc(html_favicon_url = "https://www.rust-lang.org/favicon.ico")]
//! # JSON:API Recipe
//!
//! > **A Recipe for Declarative JSON:API Serialization in Rust.**
//!
//! This crate turns plain domain objects into JSON:API documents: resource objects with
//! `type`, `id`, `attributes` and `meta`, plus a deduplicated `included` section built
//! by walking dot-separated include paths.
//!
//! ## 🏗️ Design Philosophy
//!
//! Domain types know nothing about JSON:API. They implement one small capability trait,
//! [`DomainObject`](framework::DomainObject), that answers "give me field `x`" and "give me
//! relation `y`". Everything else (which fields become attributes, what goes into `meta`,
//! which relationships can be traversed) lives in a [`ResourceDescriptor`](framework::ResourceDescriptor)
//! declared per resource kind.
//!
//! ## 🚀 Core Concepts
//!
//! ### Late-bound attribute sources
//! An attribute can be backed by an inline block, an options function, a method on the
//! kind, or the object's own field, in that precedence. The choice is made when the
//! descriptor is built, so a method declared after its attribute still takes effect.
//!
//! ### Kinds with a hierarchy
//! `cars` can [`extends`](framework::ResourceDescriptorBuilder::extends) `vehicles`: it inherits
//! attributes, methods, relationships and the meta override chain. Resolution is by exact
//! runtime type; an object whose type has no kind is skipped, never coerced to a base kind.
//!
//! ### Dedup without losing depth
//! `included` holds each `(type, id)` once, but traversal continues through objects that
//! were already included. `include=["author", "comments.author.posts"]` still reaches the
//! author's posts even though the author was emitted by the first path.
//!
//! ## 👩‍💻 Architecture Notes
//!
//! ### 1. Type-Safe Error Handling
//! Descriptor mistakes surface as [`DescriptorError`](framework::DescriptorError) at build time.
//! Serialization problems surface as [`SerializeError`](framework::SerializeError), including
//! `InvalidMetaResult` when a meta override returns a non-object.
//!
//! ### 2. Concurrency Model
//! Descriptors and the registry are immutable after setup and shared through `Arc`. Each
//! serialization call owns its included set; the concurrent entry point gives every
//! primary object its own set and merges them afterwards.
//!
//! ### 3. Observability
//! We use `tracing` with structured fields throughout. See the [`lifecycle::tracing`] module.
//!
//! ## 🗺️ Module Tour
//!
//! ### 1. The Engine ([`framework`])
//! - **Role**: Descriptors, registry, include traversal and document assembly.
//! - **Key items**: [`InclusionResolver`](framework::InclusionResolver), [`TypeRegistry`](framework::TypeRegistry).
//!
//! ### 2. The Data ([`model`])
//! A small blog (people, posts, comments, tags, vehicles) with cyclic references.
//!
//! ### 3. The Declarations ([`resources`])
//! One descriptor per kind, registered by [`resources::registry`].
//!
//! ### 4. The Orchestrator ([`lifecycle`])
//! - **Key items**: [`BlogCatalog`](lifecycle::BlogCatalog), [`setup_tracing`](lifecycle::tracing::setup_tracing).
//!
//! ## 🚀 Quick Start
//!
//! ```bash
//! # Run the demo with info logs
//! RUST_LOG=info cargo run -p jsonapi-sample
//!
//! # Run the tests
//! cargo test
//! ```

pub mod framework;
pub mod lifecycle;
pub mod model;
pub mod resources;
