//! Wiring: builds the registry and resolver once and hands them out with the data set.

pub mod catalog;
pub mod tracing;

pub use catalog::BlogCatalog;
