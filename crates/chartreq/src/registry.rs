//! Chart metadata registry.
//!
//! Charts are keyed by visualization type. Per-type metadata decides,
//! among other things, whether the chart's data is served by the legacy
//! endpoint or the v1 API.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Per-visualization-type metadata.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChartMetadata {
    /// Human-readable chart name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Whether the chart's data is served by the legacy endpoint.
    #[serde(default)]
    pub use_legacy_api: bool,
}

impl ChartMetadata {
    /// Metadata with defaults (v1 API).
    pub fn new() -> Self {
        Self::default()
    }

    /// Metadata for a chart served by the legacy endpoint.
    pub fn legacy() -> Self {
        Self {
            use_legacy_api: true,
            ..Self::default()
        }
    }

    /// Set the chart name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// A string-keyed store of chart metadata.
///
/// Registration replaces any previous entry; lookups for unregistered
/// visualization types simply miss, they never error.
#[derive(Debug, Clone, Default)]
pub struct ChartMetadataRegistry {
    items: HashMap<String, ChartMetadata>,
}

impl ChartMetadataRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register metadata under a visualization type. Chainable.
    pub fn register_value(&mut self, key: impl Into<String>, meta: ChartMetadata) -> &mut Self {
        self.items.insert(key.into(), meta);
        self
    }

    /// Look up the metadata for a visualization type.
    pub fn get(&self, key: &str) -> Option<&ChartMetadata> {
        self.items.get(key)
    }

    /// Check whether a visualization type is registered.
    pub fn has(&self, key: &str) -> bool {
        self.items.contains_key(key)
    }

    /// Remove a visualization type. Chainable; removing an unregistered
    /// key is a no-op.
    pub fn remove(&mut self, key: &str) -> &mut Self {
        self.items.remove(key);
        self
    }

    /// Registered visualization types, in no particular order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.items.keys().map(String::as_str)
    }

    /// Number of registered visualization types.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
