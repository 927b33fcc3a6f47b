//! Include path parsing and the deduplicating included set.

use indexmap::map::Entry;
use indexmap::IndexMap;
use serde_json::Value;
use std::fmt;

/// A dot-separated chain of relationship names, e.g. `author.posts.tags`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IncludePath {
    segments: Vec<String>,
}

impl IncludePath {
    /// Parses one path. Empty segments are dropped; a path with no segments left is `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        let segments: Vec<String> = raw
            .split('.')
            .map(str::trim)
            .filter(|segment| !segment.is_empty())
            .map(str::to_string)
            .collect();
        (!segments.is_empty()).then_some(Self { segments })
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

impl fmt::Display for IncludePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("."))
    }
}

/// Parses an include list. Each entry may itself hold several comma-separated paths
/// (`"author,comments.author"`); blank entries are ignored.
pub fn parse_include_paths<S: AsRef<str>>(raw: &[S]) -> Vec<IncludePath> {
    raw.iter()
        .flat_map(|entry| entry.as_ref().split(','))
        .filter_map(IncludePath::parse)
        .collect()
}

/// Resource objects keyed by `(type, id)`, in first-insertion order.
///
/// The first insertion for a key wins; later ones are ignored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IncludeSet {
    entries: IndexMap<(String, String), Value>,
}

impl IncludeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, kind: &str, id: &str) -> bool {
        self.entries.contains_key(&(kind.to_string(), id.to_string()))
    }

    /// Inserts unless the key is present. Returns `true` if the resource was added.
    pub fn insert(&mut self, kind: impl Into<String>, id: impl Into<String>, resource: Value) -> bool {
        match self.entries.entry((kind.into(), id.into())) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(resource);
                true
            }
        }
    }

    /// Appends `other`'s entries that are not already present, keeping `other`'s order.
    pub fn merge(&mut self, other: IncludeSet) {
        for ((kind, id), resource) in other.entries {
            self.insert(kind, id, resource);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_values(self) -> Vec<Value> {
        self.entries.into_values().collect()
    }
}
