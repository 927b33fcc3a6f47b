//! # Observability & Tracing
//!
//! [`setup_tracing`] installs a compact `tracing-subscriber` formatter driven by
//! `RUST_LOG`.
//!
//! ## What Gets Traced
//!
//! - **Registration** (`debug`): each kind and the runtime type it is bound to
//! - **Serialization** (`serialize` span): primary count and include path count
//! - **Traversal** (`debug`/`trace`): truncated paths, skipped objects, dedup hits
//! - **Meta overrides** (`warn`): an override that returned something other than an object
//!
//! ## Usage Examples
//!
//! ```bash
//! # Summary only
//! RUST_LOG=info cargo run -p jsonapi-sample
//!
//! # Every include decision
//! RUST_LOG=jsonapi_recipe::framework=trace cargo run -p jsonapi-sample
//! ```
//!
//! With `RUST_LOG=debug`:
//!
//! ```text
//! DEBUG Registered resource kind kind="posts" model=Some("Post")
//! INFO Resource kinds registered kinds=8
//! DEBUG serialize: No resource kind for related object, skipping relationship=vehicles type_name="Bicycle"
//! DEBUG serialize: Serialized document included=3
//! ```
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();
}
