//! Providers: named OpenAI-compatible backends behind one capability interface.
//!
//! Each variant only supplies its [`ProviderDescriptor`] and static catalog;
//! resolution, listing, merging, and instantiation are shared default methods.

mod error;
mod handle;
pub mod minimax;
pub mod openrouter;
mod registry;

use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use secrecy::SecretString;
use tokio_util::sync::CancellationToken;

use crate::core::config::{self, ConfigurationSources, ResolvedEndpoint};
use crate::core::models::fetch::{self, DynamicListing};
use crate::core::models::{ModelCatalog, ModelDescriptor};

pub use error::{ListingUnavailable, ProviderError};
pub use handle::ModelHandle;
pub use registry::ProviderRegistry;

/// Default bound on one remote listing request.
pub const DEFAULT_LISTING_TIMEOUT: Duration = Duration::from_secs(5);

/// Fallback capacity for listed models that do not report a usable context length.
pub const DEFAULT_FALLBACK_MAX_TOKENS: u64 = 8192;

/// Identity and defaults of a backend. Defined once per provider.
#[derive(Clone, Debug)]
pub struct ProviderDescriptor {
    /// Unique, stable provider name.
    pub name: &'static str,
    pub default_base_url: &'static str,
    /// Key name for the base URL in settings and environment.
    pub base_url_key: &'static str,
    /// Key name for the API key in settings and environment.
    pub api_key_key: &'static str,
    pub icon: &'static str,
    pub api_key_link: &'static str,
    pub api_key_link_label: &'static str,
    pub fallback_max_tokens: u64,
    pub listing_timeout: Duration,
}

/// The credential, or `MissingCredential` naming the key to configure.
pub(crate) fn require_credential<'e>(
    provider: &ProviderDescriptor,
    endpoint: &'e ResolvedEndpoint,
) -> Result<&'e SecretString, ProviderError> {
    match &endpoint.credential {
        Some(credential) if endpoint.has_credential() => Ok(credential),
        _ => Err(ProviderError::MissingCredential {
            provider: provider.name.to_string(),
            key: provider.api_key_key.to_string(),
        }),
    }
}

#[async_trait]
pub trait Provider: Send + Sync {
    fn descriptor(&self) -> &ProviderDescriptor;

    /// Hardcoded catalog; identical across calls.
    fn static_models(&self) -> Vec<ModelDescriptor>;

    fn name(&self) -> &str {
        self.descriptor().name
    }

    fn resolve(&self, sources: &ConfigurationSources<'_>) -> ResolvedEndpoint {
        config::resolve(sources, self.descriptor())
    }

    /// One listing attempt against `endpoint`. A missing credential is a hard error;
    /// remote problems come back as [`DynamicListing::Unavailable`].
    async fn dynamic_listing(
        &self,
        endpoint: &ResolvedEndpoint,
        cancel: Option<&CancellationToken>,
    ) -> Result<DynamicListing, ProviderError> {
        let provider = self.descriptor();
        let credential = require_credential(provider, endpoint)?;
        let static_models = self.static_models();
        let static_ids: HashSet<&str> = static_models.iter().map(|m| m.id.as_str()).collect();
        Ok(fetch::fetch_dynamic_listing(
            provider,
            &endpoint.base_url,
            credential,
            &static_ids,
            cancel,
        )
        .await)
    }

    /// Remote models not in the static catalog; empty when the listing is unavailable.
    #[allow(dead_code)]
    async fn fetch_dynamic_models(
        &self,
        endpoint: &ResolvedEndpoint,
        cancel: Option<&CancellationToken>,
    ) -> Result<Vec<ModelDescriptor>, ProviderError> {
        Ok(self.dynamic_listing(endpoint, cancel).await?.into_models())
    }

    /// Resolve, list, and merge with the static catalog, keeping the enrichment outcome.
    async fn assemble_catalog(
        &self,
        sources: &ConfigurationSources<'_>,
        cancel: Option<&CancellationToken>,
    ) -> Result<ModelCatalog, ProviderError> {
        let endpoint = self.resolve(sources);
        let listing = self.dynamic_listing(&endpoint, cancel).await?;
        Ok(ModelCatalog::assemble(self.static_models(), listing))
    }

    #[allow(dead_code)]
    async fn list_models(
        &self,
        sources: &ConfigurationSources<'_>,
        cancel: Option<&CancellationToken>,
    ) -> Result<Vec<ModelDescriptor>, ProviderError> {
        Ok(self.assemble_catalog(sources, cancel).await?.models)
    }

    /// Bind `model_id` to a freshly resolved endpoint. Never touches the network.
    fn get_model(
        &self,
        model_id: &str,
        sources: &ConfigurationSources<'_>,
    ) -> Result<ModelHandle, ProviderError> {
        let endpoint = self.resolve(sources);
        handle::instantiate(self.descriptor(), model_id, &endpoint)
    }
}
