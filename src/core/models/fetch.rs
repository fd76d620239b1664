//! Live model listing from a provider's OpenAI-compatible `GET {base}/models` endpoint.
//!
//! Listing is best-effort enrichment: every remote failure is classified as
//! [`ListingUnavailable`], logged at warn level, and returned as a value.

use std::collections::HashSet;

use log::{debug, warn};
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use super::info::ModelDescriptor;
use crate::core::provider::{ListingUnavailable, ProviderDescriptor};

/// Outcome of a single listing attempt.
#[derive(Debug)]
pub enum DynamicListing {
    /// Remote entries not present in the static catalog.
    Fetched(Vec<ModelDescriptor>),
    Unavailable(ListingUnavailable),
}

impl DynamicListing {
    /// The fetched entries, or nothing when the listing was unavailable.
    pub fn into_models(self) -> Vec<ModelDescriptor> {
        match self {
            DynamicListing::Fetched(models) => models,
            DynamicListing::Unavailable(_) => Vec::new(),
        }
    }
}

/// Query the listing endpoint once, bounded by the provider's listing timeout.
/// Entries whose id is in `static_ids` are dropped.
pub async fn fetch_dynamic_listing(
    provider: &ProviderDescriptor,
    base_url: &str,
    credential: &SecretString,
    static_ids: &HashSet<&str>,
    cancel: Option<&CancellationToken>,
) -> DynamicListing {
    match fetch_with_deadline(provider, base_url, credential, static_ids, cancel).await {
        Ok(models) => {
            debug!(
                "Fetched {} dynamic models for {}",
                models.len(),
                provider.name
            );
            DynamicListing::Fetched(models)
        }
        Err(reason) => {
            warn!(
                "Failed to fetch dynamic models for {}: {}",
                provider.name, reason
            );
            DynamicListing::Unavailable(reason)
        }
    }
}

async fn fetch_with_deadline(
    provider: &ProviderDescriptor,
    base_url: &str,
    credential: &SecretString,
    static_ids: &HashSet<&str>,
    cancel: Option<&CancellationToken>,
) -> Result<Vec<ModelDescriptor>, ListingUnavailable> {
    if cancel.is_some_and(CancellationToken::is_cancelled) {
        return Err(ListingUnavailable::Cancelled);
    }

    let deadline = provider.listing_timeout;
    let request = tokio::time::timeout(deadline, request_listing(base_url, credential));
    let outcome = match cancel {
        Some(token) => tokio::select! {
            biased;
            _ = token.cancelled() => return Err(ListingUnavailable::Cancelled),
            res = request => res,
        },
        None => request.await,
    };
    let body = outcome.map_err(|_| ListingUnavailable::Timeout(deadline))??;

    parse_listing(&body, provider, static_ids)
}

async fn request_listing(
    base_url: &str,
    credential: &SecretString,
) -> Result<String, ListingUnavailable> {
    let client = reqwest::Client::builder()
        .build()
        .map_err(ListingUnavailable::Transport)?;
    let response = client
        .get(format!("{}/models", base_url))
        .bearer_auth(credential.expose_secret())
        .send()
        .await
        .map_err(ListingUnavailable::Transport)?;

    let status = response.status();
    if !status.is_success() {
        return Err(ListingUnavailable::Status(status));
    }
    response.text().await.map_err(ListingUnavailable::Transport)
}

/// Map a `{ "data": [ { "id": ..., "context_length": ... } ] }` body to descriptors.
fn parse_listing(
    body: &str,
    provider: &ProviderDescriptor,
    static_ids: &HashSet<&str>,
) -> Result<Vec<ModelDescriptor>, ListingUnavailable> {
    let value: Value = serde_json::from_str(body).map_err(ListingUnavailable::Parse)?;
    let entries = value
        .get("data")
        .and_then(Value::as_array)
        .ok_or(ListingUnavailable::ShapeMismatch)?;

    let mut seen = HashSet::new();
    let mut models = Vec::with_capacity(entries.len());
    for entry in entries {
        let Some(id) = entry
            .get("id")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|id| !id.is_empty())
        else {
            continue;
        };
        if static_ids.contains(id) || !seen.insert(id) {
            continue;
        }
        let max_tokens = entry
            .get("context_length")
            .and_then(Value::as_f64)
            .filter(|n| *n >= 1.0)
            .map(|n| n as u64)
            .unwrap_or(provider.fallback_max_tokens);
        models.push(ModelDescriptor::new(id, id, provider.name, max_tokens));
    }
    Ok(models)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::provider::minimax::MINIMAX;
    use std::time::Duration;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn static_ids() -> HashSet<&'static str> {
        ["MiniMax-M1", "MiniMax-Text-01"].into_iter().collect()
    }

    fn key() -> SecretString {
        SecretString::from("test-key".to_owned())
    }

    async fn listing_for(server: &MockServer, provider: &ProviderDescriptor) -> DynamicListing {
        fetch_dynamic_listing(provider, &server.uri(), &key(), &static_ids(), None).await
    }

    #[test]
    fn parse_maps_context_length_and_fallback() {
        let body = r#"{ "data": [
            { "id": "a", "context_length": 32000 },
            { "id": "b" },
            { "id": "c", "context_length": 0 },
            { "id": "d", "context_length": -5 },
            { "id": "e", "context_length": "big" }
        ] }"#;
        let models = parse_listing(body, &MINIMAX, &static_ids()).unwrap();
        let caps: Vec<(&str, u64)> = models.iter().map(|m| (m.id.as_str(), m.max_tokens)).collect();
        assert_eq!(
            caps,
            [("a", 32000), ("b", 8192), ("c", 8192), ("d", 8192), ("e", 8192)]
        );
        assert!(models.iter().all(|m| m.provider == "MiniMax" && m.label == m.id));
    }

    #[test]
    fn parse_skips_static_ids_and_entries_without_id() {
        let body = r#"{ "data": [ { "id": "MiniMax-M1" }, { "name": "no-id" }, { "id": "x" }, { "id": "x" } ] }"#;
        let models = parse_listing(body, &MINIMAX, &static_ids()).unwrap();
        assert_eq!(models.len(), 1);
        assert_eq!(models[0].id, "x");
    }

    #[test]
    fn parse_trims_ids_and_skips_blank_ones() {
        let body = r#"{ "data": [ { "id": "" }, { "id": "   " }, { "id": " MiniMax-M1 " }, { "id": " X " }, { "id": "X" } ] }"#;
        let models = parse_listing(body, &MINIMAX, &static_ids()).unwrap();
        assert_eq!(models, vec![ModelDescriptor::new("X", "X", "MiniMax", 8192)]);
    }

    #[test]
    fn parse_rejects_wrong_shapes() {
        for body in [r#"{ "models": [] }"#, r#"{ "data": {} }"#, r#"[1, 2]"#] {
            let err = parse_listing(body, &MINIMAX, &static_ids()).unwrap_err();
            assert!(matches!(err, ListingUnavailable::ShapeMismatch), "{body}");
        }
        let err = parse_listing("<html>", &MINIMAX, &static_ids()).unwrap_err();
        assert!(matches!(err, ListingUnavailable::Parse(_)));
    }

    #[tokio::test]
    async fn sends_bearer_credential_to_models_path() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/models"))
            .and(header("authorization", "Bearer test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": [{ "id": "X", "context_length": 32000 }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let models = listing_for(&server, &MINIMAX).await.into_models();
        assert_eq!(models, vec![ModelDescriptor::new("X", "X", "MiniMax", 32000)]);
    }

    #[tokio::test]
    async fn http_error_is_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/models"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        match listing_for(&server, &MINIMAX).await {
            DynamicListing::Unavailable(ListingUnavailable::Status(status)) => {
                assert_eq!(status.as_u16(), 404)
            }
            other => panic!("expected Status(404), got {:?}", other),
        }
    }

    #[tokio::test]
    async fn slow_endpoint_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/models"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "data": [] }))
                    .set_delay(Duration::from_secs(5)),
            )
            .mount(&server)
            .await;

        let provider = ProviderDescriptor {
            listing_timeout: Duration::from_millis(100),
            ..MINIMAX
        };
        match listing_for(&server, &provider).await {
            DynamicListing::Unavailable(ListingUnavailable::Timeout(after)) => {
                assert_eq!(after, Duration::from_millis(100))
            }
            other => panic!("expected Timeout, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn cancelled_token_skips_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let token = CancellationToken::new();
        token.cancel();
        let listing =
            fetch_dynamic_listing(&MINIMAX, &server.uri(), &key(), &static_ids(), Some(&token)).await;
        assert!(matches!(
            listing,
            DynamicListing::Unavailable(ListingUnavailable::Cancelled)
        ));
    }

    #[tokio::test]
    async fn cancellation_aborts_in_flight_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/models"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
            .mount(&server)
            .await;

        let token = CancellationToken::new();
        let canceller = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            canceller.cancel();
        });
        let listing =
            fetch_dynamic_listing(&MINIMAX, &server.uri(), &key(), &static_ids(), Some(&token)).await;
        assert!(matches!(
            listing,
            DynamicListing::Unavailable(ListingUnavailable::Cancelled)
        ));
    }

    #[tokio::test]
    async fn unreachable_host_is_transport_error() {
        let listing = fetch_dynamic_listing(
            &MINIMAX,
            "http://127.0.0.1:1",
            &key(),
            &static_ids(),
            None,
        )
        .await;
        assert!(matches!(
            listing,
            DynamicListing::Unavailable(ListingUnavailable::Transport(_))
        ));
    }
}
