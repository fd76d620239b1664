//! Endpoint resolution: one base URL and credential per provider, picked from
//! layered configuration sources.
//!
//! Precedence, applied to base URL and credential independently:
//! explicit session value > persisted settings > process environment > provider default.
//! Credentials have no default; an absent credential is a valid result here.

use std::collections::HashMap;
use std::fmt;

use log::trace;
use secrecy::{ExposeSecret, SecretString};

use crate::core::provider::ProviderDescriptor;
use crate::core::settings::PersistedSettings;

/// Configuration layer a resolved value came from, highest precedence first.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfigLayer {
    Explicit,
    Persisted,
    Environment,
    Default,
}

impl fmt::Display for ConfigLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ConfigLayer::Explicit => "explicit",
            ConfigLayer::Persisted => "settings",
            ConfigLayer::Environment => "environment",
            ConfigLayer::Default => "default",
        };
        f.write_str(s)
    }
}

/// Values supplied for this call or session, keyed by provider name.
#[derive(Clone, Default)]
pub struct ExplicitValues {
    api_keys: HashMap<String, String>,
    base_urls: HashMap<String, String>,
}

impl ExplicitValues {
    pub fn with_api_key(mut self, provider: impl Into<String>, key: impl Into<String>) -> Self {
        self.api_keys.insert(provider.into(), key.into());
        self
    }

    pub fn with_base_url(mut self, provider: impl Into<String>, url: impl Into<String>) -> Self {
        self.base_urls.insert(provider.into(), url.into());
        self
    }

    fn api_key(&self, provider: &str) -> Option<&str> {
        self.api_keys.get(provider).map(String::as_str)
    }

    fn base_url(&self, provider: &str) -> Option<&str> {
        self.base_urls.get(provider).map(String::as_str)
    }
}

impl fmt::Debug for ExplicitValues {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExplicitValues")
            .field("api_keys_for", &self.api_keys.keys().collect::<Vec<_>>())
            .field("base_urls", &self.base_urls)
            .finish()
    }
}

/// Immutable snapshot of process environment values.
#[derive(Clone, Default)]
pub struct EnvSnapshot(HashMap<String, String>);

impl EnvSnapshot {
    /// Capture the current process environment. Non-UTF-8 entries are skipped.
    pub fn capture() -> Self {
        Self(
            std::env::vars_os()
                .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
                .collect(),
        )
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for EnvSnapshot {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl fmt::Debug for EnvSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EnvSnapshot({} vars)", self.0.len())
    }
}

/// Per-call bundle of the three optional configuration inputs.
#[derive(Clone, Copy, Debug, Default)]
pub struct ConfigurationSources<'a> {
    pub explicit: Option<&'a ExplicitValues>,
    pub persisted: Option<&'a PersistedSettings>,
    pub environment: Option<&'a EnvSnapshot>,
}

/// Effective base URL and credential for one provider. Recomputed on every call.
#[derive(Debug)]
pub struct ResolvedEndpoint {
    pub base_url: String,
    pub base_url_source: ConfigLayer,
    pub credential: Option<SecretString>,
    pub credential_source: Option<ConfigLayer>,
}

impl ResolvedEndpoint {
    /// Endpoint built directly from explicit values.
    #[cfg(test)]
    pub fn new(base_url: impl Into<String>, credential: Option<&str>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            base_url_source: ConfigLayer::Explicit,
            credential: credential.map(|c| SecretString::from(c.to_owned())),
            credential_source: credential.map(|_| ConfigLayer::Explicit),
        }
    }

    pub fn has_credential(&self) -> bool {
        self.credential
            .as_ref()
            .is_some_and(|c| !c.expose_secret().is_empty())
    }
}

/// First candidate holding a non-blank value, in the order given.
fn first_present<'s>(
    candidates: [(ConfigLayer, Option<&'s str>); 3],
) -> Option<(ConfigLayer, &'s str)> {
    candidates.into_iter().find_map(|(layer, value)| {
        value
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(|v| (layer, v))
    })
}

/// Resolve the endpoint for a provider. Performs no I/O and cannot fail.
pub fn resolve(
    sources: &ConfigurationSources<'_>,
    provider: &ProviderDescriptor,
) -> ResolvedEndpoint {
    let name = provider.name;
    let settings = sources.persisted.and_then(|s| s.for_provider(name));
    let explicit = sources.explicit;
    let env = sources.environment;

    let base_url = first_present([
        (ConfigLayer::Explicit, explicit.and_then(|e| e.base_url(name))),
        (
            ConfigLayer::Persisted,
            settings.and_then(|s| s.get(provider.base_url_key)),
        ),
        (
            ConfigLayer::Environment,
            env.and_then(|e| e.get(provider.base_url_key)),
        ),
    ]);
    let credential = first_present([
        (ConfigLayer::Explicit, explicit.and_then(|e| e.api_key(name))),
        (
            ConfigLayer::Persisted,
            settings.and_then(|s| s.get(provider.api_key_key)),
        ),
        (
            ConfigLayer::Environment,
            env.and_then(|e| e.get(provider.api_key_key)),
        ),
    ]);

    let (base_url_source, base_url) =
        base_url.unwrap_or((ConfigLayer::Default, provider.default_base_url));
    trace!("{}: base URL from {} layer", name, base_url_source);
    match &credential {
        Some((layer, _)) => trace!("{}: credential from {} layer", name, layer),
        None => trace!("{}: no credential configured", name),
    }

    ResolvedEndpoint {
        base_url: base_url.trim_end_matches('/').to_string(),
        base_url_source,
        credential_source: credential.map(|(layer, _)| layer),
        credential: credential.map(|(_, v)| SecretString::from(v.to_owned())),
    }
}
