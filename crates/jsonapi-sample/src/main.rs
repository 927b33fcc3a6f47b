//! # JSON:API Recipe Demo
//!
//! Serializes the sample blog a few different ways and prints each document.
//!
//! ## 📚 What It Shows
//!
//! 1.  A single post with its author and comment authors included.
//! 2.  Every person with their vehicles: cars and boats are included, the bicycle is not.
//! 3.  All posts serialized concurrently, with self links and relationship linkage.

use jsonapi_recipe::framework::{Context, Document, SerializerConfig};
use jsonapi_recipe::lifecycle::tracing::setup_tracing;
use jsonapi_recipe::lifecycle::BlogCatalog;
use tracing::{error, info, Instrument};

fn print(title: &str, document: &Document) -> Result<(), String> {
    let pretty = serde_json::to_string_pretty(document).map_err(|e| e.to_string())?;
    println!("== {title} ==\n{pretty}\n");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), String> {
    setup_tracing();

    info!("Starting JSON:API demo");

    let catalog = BlogCatalog::new().map_err(|e| e.to_string())?;
    let context = Context::new().with("viewer", "demo");

    let span = tracing::info_span!("single_post");
    let document = span
        .in_scope(|| catalog.post_document(1, &context, &["author", "comments.commenter"]))
        .map_err(|e| e.to_string())?;
    print("post 1", &document)?;

    let span = tracing::info_span!("people_with_vehicles");
    let document = span
        .in_scope(|| catalog.people_document(&context, &["vehicles.owner"]))
        .map_err(|e| e.to_string())?;
    print("people", &document)?;

    let config = SerializerConfig::from_json_str(r#"{"base_url": "https://blog.example", "include_linkage": true}"#)
        .map_err(|e| e.to_string())?;
    let linked = BlogCatalog::with_config(config).map_err(|e| e.to_string())?;

    let span = tracing::info_span!("all_posts_concurrent");
    let result = async {
        info!("Serializing every post on blocking tasks");
        linked.posts_document_concurrent(&context, &["tags", "author.vehicles"]).await
    }
    .instrument(span)
    .await;

    match result {
        Ok(document) => print("all posts", &document)?,
        Err(e) => error!(error = %e, "Concurrent serialization failed"),
    }

    info!("Demo completed successfully");
    Ok(())
}
