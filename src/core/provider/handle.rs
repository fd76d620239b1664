//! Model handle factory: binds a model id to a resolved endpoint through the
//! OpenAI-compatible client. No request is made until the client is used.

use std::fmt;

use async_openai::Client;
use async_openai::config::OpenAIConfig;
use secrecy::ExposeSecret;

use super::{ProviderDescriptor, ProviderError};
use crate::core::config::ResolvedEndpoint;

/// An invocable model bound to a base URL and credential.
pub struct ModelHandle {
    provider: String,
    model_id: String,
    base_url: String,
    client: Client<OpenAIConfig>,
}

impl ModelHandle {
    pub fn provider(&self) -> &str {
        &self.provider
    }

    pub fn model_id(&self) -> &str {
        &self.model_id
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Client that executes requests for this model.
    #[allow(dead_code)]
    pub fn client(&self) -> &Client<OpenAIConfig> {
        &self.client
    }
}

impl fmt::Debug for ModelHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelHandle")
            .field("provider", &self.provider)
            .field("model_id", &self.model_id)
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

/// Build a handle for `model_id`. Fails with `MissingCredential` when no key resolved,
/// and with `Instantiation` for an empty model id or an unusable base URL.
pub fn instantiate(
    provider: &ProviderDescriptor,
    model_id: &str,
    endpoint: &ResolvedEndpoint,
) -> Result<ModelHandle, ProviderError> {
    let credential = super::require_credential(provider, endpoint)?;
    let instantiation = |reason: String| ProviderError::Instantiation {
        provider: provider.name.to_string(),
        reason,
    };

    let model_id = model_id.trim();
    if model_id.is_empty() {
        return Err(instantiation("model id is empty".to_string()));
    }
    let url = reqwest::Url::parse(&endpoint.base_url)
        .map_err(|e| instantiation(format!("invalid base URL {:?}: {}", endpoint.base_url, e)))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(instantiation(format!(
            "unsupported base URL scheme {:?}",
            url.scheme()
        )));
    }

    let config = OpenAIConfig::new()
        .with_api_base(endpoint.base_url.as_str())
        .with_api_key(credential.expose_secret());

    Ok(ModelHandle {
        provider: provider.name.to_string(),
        model_id: model_id.to_string(),
        base_url: endpoint.base_url.clone(),
        client: Client::with_config(config),
    })
}
