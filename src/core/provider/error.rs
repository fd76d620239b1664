//! Provider error types.

use std::time::Duration;

/// Errors surfaced to callers of a provider.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// No credential resolved from any configuration source.
    #[error("Missing API key for {provider} provider (set {key})")]
    MissingCredential { provider: String, key: String },
    /// The model handle could not be bound for a reason other than a missing key.
    #[error("Failed to create model instance for {provider}: {reason}")]
    Instantiation { provider: String, reason: String },
}

/// Why the remote model listing could not be used. Recovered inside the provider:
/// the catalog falls back to static models only.
#[derive(Debug, thiserror::Error)]
pub enum ListingUnavailable {
    #[error("listing timed out after {0:?}")]
    Timeout(Duration),
    #[error("listing cancelled")]
    Cancelled,
    #[error("transport error: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("listing endpoint returned HTTP {0}")]
    Status(reqwest::StatusCode),
    #[error("listing body is not valid JSON: {0}")]
    Parse(#[source] serde_json::Error),
    #[error("listing body has no `data` array")]
    ShapeMismatch,
}
