//! Catalog merging: static entries first, then dynamic entries with unseen ids.

use std::collections::HashSet;

use super::fetch::DynamicListing;
use super::info::ModelDescriptor;
use crate::core::provider::ListingUnavailable;

/// Union of static and dynamic descriptors. Static entries are kept as-is and in
/// order; a dynamic entry is appended only if its id has not been seen yet.
pub fn merge(
    static_models: &[ModelDescriptor],
    dynamic: &[ModelDescriptor],
) -> Vec<ModelDescriptor> {
    let mut seen: HashSet<&str> = static_models.iter().map(|m| m.id.as_str()).collect();
    let mut merged = static_models.to_vec();
    for model in dynamic {
        if seen.insert(model.id.as_str()) {
            merged.push(model.clone());
        }
    }
    merged
}

/// Whether live enrichment contributed to a catalog.
#[derive(Debug)]
pub enum Enrichment {
    Merged { dynamic_count: usize },
    StaticOnly { reason: ListingUnavailable },
}

/// A provider's assembled model catalog.
#[derive(Debug)]
pub struct ModelCatalog {
    pub models: Vec<ModelDescriptor>,
    pub enrichment: Enrichment,
}

impl ModelCatalog {
    pub fn assemble(static_models: Vec<ModelDescriptor>, listing: DynamicListing) -> Self {
        match listing {
            DynamicListing::Fetched(dynamic) => {
                let models = merge(&static_models, &dynamic);
                let dynamic_count = models.len() - static_models.len();
                Self {
                    models,
                    enrichment: Enrichment::Merged { dynamic_count },
                }
            }
            DynamicListing::Unavailable(reason) => Self {
                models: static_models,
                enrichment: Enrichment::StaticOnly { reason },
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model(id: &str, label: &str, max_tokens: u64) -> ModelDescriptor {
        ModelDescriptor::new(id, label, "MiniMax", max_tokens)
    }

    fn statics() -> Vec<ModelDescriptor> {
        vec![
            model("MiniMax-M1", "MiniMax-M1 (Reasoning Model)", 8192),
            model("MiniMax-Text-01", "MiniMax-Text-01", 2048),
        ]
    }

    #[test]
    fn static_first_then_new_dynamic() {
        let dynamic = vec![model("abab6.5s", "abab6.5s", 245760)];
        let merged = merge(&statics(), &dynamic);
        let ids: Vec<&str> = merged.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, ["MiniMax-M1", "MiniMax-Text-01", "abab6.5s"]);
    }

    #[test]
    fn static_wins_on_duplicate_id() {
        let dynamic = vec![model("MiniMax-M1", "MiniMax-M1", 1_000_000)];
        let merged = merge(&statics(), &dynamic);
        assert_eq!(merged, statics());
    }

    #[test]
    fn duplicate_dynamic_ids_collapse() {
        let dynamic = vec![model("x", "first", 100), model("x", "second", 200)];
        let merged = merge(&statics(), &dynamic);
        let xs: Vec<_> = merged.iter().filter(|m| m.id == "x").collect();
        assert_eq!(xs.len(), 1);
        assert_eq!(xs[0].label, "first");
    }

    #[test]
    fn merge_is_idempotent() {
        let dynamic = vec![
            model("x", "x", 100),
            model("MiniMax-Text-01", "remote", 1),
            model("y", "y", 200),
        ];
        let once = merge(&statics(), &dynamic);
        assert_eq!(merge(&once, &dynamic), once);
    }

    #[test]
    fn unavailable_listing_keeps_static_catalog() {
        let catalog = ModelCatalog::assemble(
            statics(),
            DynamicListing::Unavailable(ListingUnavailable::ShapeMismatch),
        );
        assert!(matches!(catalog.enrichment, Enrichment::StaticOnly { .. }));
        assert_eq!(catalog.models, statics());
    }

    #[test]
    fn fetched_listing_counts_added_entries() {
        let dynamic = vec![model("x", "x", 100), model("MiniMax-M1", "dup", 1)];
        let catalog = ModelCatalog::assemble(statics(), DynamicListing::Fetched(dynamic));
        match catalog.enrichment {
            Enrichment::Merged { dynamic_count } => assert_eq!(dynamic_count, 1),
            other => panic!("expected Merged, got {:?}", other),
        }
        assert_eq!(catalog.models.len(), 3);
    }
}
