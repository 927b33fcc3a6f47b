//! The vehicle hierarchy: `vehicles` as the base kind, `cars` and `boats` under it.
//!
//! `Bicycle` is deliberately left without a kind; bicycles never show up in output.

use crate::framework::{DescriptorError, ResourceDescriptor};
use serde_json::{json, Value};

/// Base kind. Not bound to a runtime type.
pub fn vehicles() -> Result<ResourceDescriptor, DescriptorError> {
    ResourceDescriptor::builder("vehicles")
        .attributes(["make", "model_year"])
        .meta_attribute("serial_number")
        .has_one("owner")
        .meta(|_, mut meta| {
            meta.insert("category".into(), json!("vehicle"));
            Ok(Value::Object(meta))
        })
        .build()
}

pub fn cars(vehicles: &ResourceDescriptor) -> Result<ResourceDescriptor, DescriptorError> {
    ResourceDescriptor::builder("cars")
        .extends(vehicles)
        .model_name("Car")
        .attribute("drive_layout")
        .meta(|r, mut meta| {
            meta.insert("category".into(), json!("car"));
            meta.insert("doors".into(), r.field("doors")?);
            Ok(Value::Object(meta))
        })
        .build()
}

pub fn boats(vehicles: &ResourceDescriptor) -> Result<ResourceDescriptor, DescriptorError> {
    ResourceDescriptor::builder("boats")
        .extends(vehicles)
        .model_name("Boat")
        .attribute("length_in_feet")
        .build()
}
