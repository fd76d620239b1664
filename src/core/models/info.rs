//! Model descriptor shared by static catalogs, live listings, and the merger.

use serde::Serialize;

/// One model a provider can serve.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ModelDescriptor {
    /// Unique within the owning provider.
    pub id: String,
    pub label: String,
    /// Always the owning provider's name.
    pub provider: String,
    /// Maximum-token capacity; always positive.
    pub max_tokens: u64,
}

impl ModelDescriptor {
    pub fn new(
        id: impl Into<String>,
        label: impl Into<String>,
        provider: impl Into<String>,
        max_tokens: u64,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            provider: provider.into(),
            max_tokens,
        }
    }
}

/// Hardcoded catalog entry: (id, label, max tokens).
pub type StaticModel = (&'static str, &'static str, u64);

/// Build descriptors for a provider's static catalog, preserving order.
pub fn static_descriptors(provider: &str, entries: &[StaticModel]) -> Vec<ModelDescriptor> {
    entries
        .iter()
        .map(|&(id, label, max_tokens)| ModelDescriptor::new(id, label, provider, max_tokens))
        .collect()
}
