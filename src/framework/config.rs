//! Serializer configuration and the key-casing policy.

use crate::framework::error::SerializeError;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Options that change the shape of emitted resource objects.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SerializerConfig {
    /// When set, every resource object gets `links.self = "{base_url}/{type}/{id}"`.
    pub base_url: Option<String>,
    /// When set, every resource object gets a `relationships` member with resource
    /// identifier linkage for each declared relationship.
    pub include_linkage: bool,
}

impl SerializerConfig {
    /// Loads a configuration from JSON. Missing keys take their defaults.
    pub fn from_json_str(raw: &str) -> Result<Self, SerializeError> {
        serde_json::from_str(raw).map_err(|e| SerializeError::InvalidConfig(e.to_string()))
    }

    pub fn self_link(&self, kind: &str, id: &str) -> Option<String> {
        self.base_url
            .as_deref()
            .map(|base| format!("{}/{kind}/{id}", base.trim_end_matches('/')))
    }
}

/// Pure transform applied to attribute, meta and relationship keys right before emission.
pub type KeyFormatter = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// Leaves keys untouched.
pub fn as_is() -> KeyFormatter {
    Arc::new(|key: &str| key.to_string())
}
