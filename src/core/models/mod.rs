//! Model catalogs: static entries, live listing, and merging.

pub mod fetch;
mod info;
pub mod merge;

pub use info::{ModelDescriptor, StaticModel, static_descriptors};
pub use merge::{Enrichment, ModelCatalog};

/// Filter models by query (case-insensitive match on id or label).
pub fn filter_models<'a>(models: &'a [ModelDescriptor], query: &str) -> Vec<&'a ModelDescriptor> {
    let q = query.trim().to_lowercase();
    if q.is_empty() {
        return models.iter().collect();
    }
    models
        .iter()
        .filter(|m| m.id.to_lowercase().contains(&q) || m.label.to_lowercase().contains(&q))
        .collect()
}
