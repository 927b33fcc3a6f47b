//! # Type Registry
//!
//! Maps runtime type names and kind names to [`ResourceDescriptor`]s.
//!
//! Resolution is explicit: a concrete runtime type resolves only if a descriptor was
//! registered for it. There is no fallback to a base kind, so a collection of mixed
//! runtime types serializes only the members whose types are known.

use crate::framework::descriptor::ResourceDescriptor;
use crate::framework::object::DomainObject;
use indexmap::IndexMap;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Registered resource kinds.
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    by_kind: IndexMap<String, Arc<ResourceDescriptor>>,
    by_model: HashMap<String, Arc<ResourceDescriptor>>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a descriptor under its kind and, if bound, its model name.
    /// A later registration for the same kind or model replaces the earlier one.
    pub fn register(&mut self, descriptor: ResourceDescriptor) -> Arc<ResourceDescriptor> {
        let descriptor = Arc::new(descriptor);
        self.register_shared(descriptor.clone());
        descriptor
    }

    pub fn register_shared(&mut self, descriptor: Arc<ResourceDescriptor>) {
        debug!(kind = descriptor.kind(), model = ?descriptor.model_name(), "Registered resource kind");
        if let Some(model) = descriptor.model_name() {
            self.by_model.insert(model.to_string(), descriptor.clone());
        }
        self.by_kind.insert(descriptor.kind().to_string(), descriptor);
    }

    /// Builder-style [`register`](Self::register).
    pub fn with(mut self, descriptor: ResourceDescriptor) -> Self {
        self.register(descriptor);
        self
    }

    /// Picks the descriptor for `object`.
    ///
    /// An explicit `override_kind` wins unconditionally over the object's runtime type.
    /// Returns `None` when nothing matches; callers skip such objects.
    pub fn resolve(&self, object: &dyn DomainObject, override_kind: Option<&str>) -> Option<Arc<ResourceDescriptor>> {
        match override_kind {
            Some(kind) => self.get_kind(kind),
            None => self.for_type_name(object.type_name()),
        }
    }

    pub fn get_kind(&self, kind: &str) -> Option<Arc<ResourceDescriptor>> {
        self.by_kind.get(kind).cloned()
    }

    pub fn for_type_name(&self, type_name: &str) -> Option<Arc<ResourceDescriptor>> {
        self.by_model.get(type_name).cloned()
    }

    /// Kind names in registration order.
    pub fn kinds(&self) -> impl Iterator<Item = &str> {
        self.by_kind.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.by_kind.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_kind.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framework::mock::MockObject;

    fn registry() -> TypeRegistry {
        let vehicles = ResourceDescriptor::builder("vehicles").attribute("name").build().unwrap();
        let cars = ResourceDescriptor::builder("cars")
            .extends(&vehicles)
            .model_name("Car")
            .build()
            .unwrap();
        TypeRegistry::new().with(vehicles).with(cars)
    }

    #[test]
    fn test_resolves_by_runtime_type() {
        let registry = registry();
        let car = MockObject::new("Car", 1);
        assert_eq!(registry.resolve(&car, None).unwrap().kind(), "cars");
    }

    #[test]
    fn test_unregistered_type_has_no_base_fallback() {
        let registry = registry();
        let boat = MockObject::new("Boat", 2);
        assert!(registry.resolve(&boat, None).is_none());
        // Kinds without a model are reachable only through an override.
        let vehicle = MockObject::new("Vehicle", 3);
        assert!(registry.resolve(&vehicle, None).is_none());
    }

    #[test]
    fn test_override_wins_over_runtime_type() {
        let registry = registry();
        let car = MockObject::new("Car", 1);
        let boat = MockObject::new("Boat", 2);
        assert_eq!(registry.resolve(&car, Some("vehicles")).unwrap().kind(), "vehicles");
        assert_eq!(registry.resolve(&boat, Some("cars")).unwrap().kind(), "cars");
        assert!(registry.resolve(&car, Some("planes")).is_none());
    }

    #[test]
    fn test_introspection() {
        let registry = registry();
        assert_eq!(registry.kinds().collect::<Vec<_>>(), vec!["vehicles", "cars"]);
        assert_eq!(registry.len(), 2);
        assert!(!registry.is_empty());
        assert!(registry.get_kind("cars").unwrap().is_a("vehicles"));
        assert!(registry.for_type_name("Car").is_some());
        assert!(TypeRegistry::new().is_empty());
    }
}
