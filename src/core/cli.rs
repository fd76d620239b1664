//! CLI commands: providers, models, config, check.
//!
//! These produce plain text output; failures print to stderr and exit non-zero.

use futures::future::join_all;
use tokio_util::sync::CancellationToken;

use crate::core::config::{ConfigurationSources, EnvSnapshot, ExplicitValues};
use crate::core::models::{self, Enrichment, ModelDescriptor};
use crate::core::paths;
use crate::core::provider::{Provider, ProviderError, ProviderRegistry};
use crate::core::settings::{self, PersistedSettings};

/// Inputs shared by every command: registry plus the persisted and environment layers.
pub struct CommandContext {
    pub registry: ProviderRegistry,
    pub settings: PersistedSettings,
    pub env: EnvSnapshot,
}

impl CommandContext {
    /// Load persisted settings and snapshot the environment. Exits on unreadable settings.
    pub fn load() -> Self {
        let env = EnvSnapshot::capture();
        let settings = settings::load_settings(&env).unwrap_or_else(|e| {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        });
        Self {
            registry: ProviderRegistry::builtin(),
            settings,
            env,
        }
    }

    fn sources<'a>(&'a self, explicit: &'a ExplicitValues) -> ConfigurationSources<'a> {
        ConfigurationSources {
            explicit: Some(explicit),
            persisted: Some(&self.settings),
            environment: Some(&self.env),
        }
    }

    fn provider(&self, name: &str) -> &dyn Provider {
        self.registry.get(name).unwrap_or_else(|| {
            eprintln!(
                "Error: unknown provider '{}' (run `providers` to list them)",
                name
            );
            std::process::exit(1);
        })
    }

    /// The named provider, or all providers (`enabled_only` filters by settings).
    fn select(&self, name: Option<&str>, enabled_only: bool) -> Vec<&dyn Provider> {
        match name {
            Some(name) => vec![self.provider(name)],
            None if enabled_only => self.registry.enabled(&self.settings).collect(),
            None => self.registry.iter().collect(),
        }
    }
}

/// Explicit values from `--api-key` / `--base-url`, keyed by the provider's canonical name.
pub fn explicit_values(
    provider: Option<&dyn Provider>,
    api_key: Option<String>,
    base_url: Option<String>,
) -> ExplicitValues {
    let Some(provider) = provider else {
        return ExplicitValues::default();
    };
    let mut explicit = ExplicitValues::default();
    if let Some(key) = api_key {
        explicit = explicit.with_api_key(provider.name(), key);
    }
    if let Some(url) = base_url {
        explicit = explicit.with_base_url(provider.name(), url);
    }
    explicit
}

/// Run the `providers` command.
pub fn run_providers(ctx: &CommandContext, json: bool) {
    if json {
        let providers: Vec<serde_json::Value> = ctx
            .registry
            .iter()
            .map(|p| {
                let d = p.descriptor();
                serde_json::json!({
                    "name": d.name,
                    "enabled": ctx.settings.is_enabled(d.name),
                    "baseUrl": d.default_base_url,
                    "baseUrlKey": d.base_url_key,
                    "apiKeyKey": d.api_key_key,
                    "icon": d.icon,
                    "apiKeyLink": d.api_key_link,
                    "apiKeyLinkLabel": d.api_key_link_label,
                })
            })
            .collect();
        match serde_json::to_string_pretty(&providers) {
            Ok(out) => println!("{}", out),
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
        return;
    }

    for p in ctx.registry.iter() {
        let d = p.descriptor();
        let status = if ctx.settings.is_enabled(d.name) {
            "enabled"
        } else {
            "disabled"
        };
        println!(
            "{:<12} {:<9} {:<32} {}",
            d.name, status, d.default_base_url, d.api_key_link
        );
    }
}

/// Run the `config` command: resolved base URL and credential source, never the value.
pub fn run_config(
    ctx: &CommandContext,
    provider: Option<&str>,
    api_key: Option<String>,
    base_url: Option<String>,
) {
    let explicit = explicit_values(provider.map(|n| ctx.provider(n)), api_key, base_url);
    let sources = ctx.sources(&explicit);

    let settings_path = paths::config_dir(&ctx.env)
        .map(|p| p.join(settings::SETTINGS_FILE).display().to_string())
        .unwrap_or_else(|| "—".to_string());
    println!("Settings: {}", settings_path);

    for p in ctx.select(provider, false) {
        let d = p.descriptor();
        let endpoint = p.resolve(&sources);
        let key_status = match endpoint.credential_source {
            Some(layer) if endpoint.has_credential() => format!("set ({})", layer),
            _ => format!("not set (set {}; {})", d.api_key_key, d.api_key_link_label),
        };
        println!();
        println!("{}", d.name);
        println!(
            "  Base URL: {} ({})",
            endpoint.base_url, endpoint.base_url_source
        );
        println!("  API key:  {}", key_status);
    }
}

/// Format context length as human-readable (e.g. "128k", "1M").
fn format_context(n: u64) -> String {
    if n >= 1_000_000 {
        format!("{:.1}M", n as f64 / 1_000_000.0)
    } else if n >= 1_000 {
        format!("{}k", n / 1_000)
    } else {
        n.to_string()
    }
}

/// Ctrl-C handling for listings: the first interrupt cancels them, any later one
/// (or one after they finished) should end the process.
fn interrupt_exits(listing: &CancellationToken) -> bool {
    if listing.is_cancelled() {
        return true;
    }
    listing.cancel();
    false
}

/// Run the `models` command: assemble catalogs (concurrently when listing all providers).
/// Ctrl-C cancels in-flight listings; affected providers fall back to static models.
pub async fn run_models(
    ctx: &CommandContext,
    provider: Option<&str>,
    query: Option<&str>,
    json: bool,
    api_key: Option<String>,
    base_url: Option<String>,
) {
    let single = provider.is_some();
    let explicit = explicit_values(provider.map(|n| ctx.provider(n)), api_key, base_url);
    let sources = ctx.sources(&explicit);
    let selected = ctx.select(provider, true);

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        while tokio::signal::ctrl_c().await.is_ok() {
            if interrupt_exits(&on_interrupt) {
                std::process::exit(130);
            }
        }
    });

    let results = join_all(
        selected
            .iter()
            .map(|p| p.assemble_catalog(&sources, Some(&cancel))),
    )
    .await;
    // Listings are over; the next Ctrl-C exits.
    cancel.cancel();

    let mut listed: Vec<ModelDescriptor> = Vec::new();
    for (p, result) in selected.iter().zip(results) {
        match result {
            Ok(catalog) => {
                match &catalog.enrichment {
                    Enrichment::Merged { dynamic_count } => {
                        log::info!("{}: {} model(s) from live listing", p.name(), dynamic_count)
                    }
                    Enrichment::StaticOnly { reason } => {
                        log::info!("{}: static models only ({})", p.name(), reason)
                    }
                }
                listed.extend(catalog.models);
            }
            Err(e @ ProviderError::MissingCredential { .. }) if !single => {
                eprintln!("Skipping {}: {}", p.name(), e);
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
    }

    let filtered = models::filter_models(&listed, query.unwrap_or(""));

    if json {
        match serde_json::to_string_pretty(&filtered) {
            Ok(out) => println!("{}", out),
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
        return;
    }

    if filtered.is_empty() {
        println!("No models found.");
        return;
    }

    let id_w = filtered.iter().map(|m| m.id.len()).max().unwrap_or(20).max(20);
    let label_w = filtered
        .iter()
        .map(|m| m.label.len())
        .max()
        .unwrap_or(30)
        .max(30);

    println!(
        "{:<12}  {:<id_w$}  {:<label_w$}  {:>7}",
        "Provider", "ID", "Label", "Tokens"
    );
    println!(
        "{}  {}  {}  -------",
        "-".repeat(12),
        "-".repeat(id_w),
        "-".repeat(label_w)
    );
    for m in &filtered {
        println!(
            "{:<12}  {:<id_w$}  {:<label_w$}  {:>7}",
            m.provider,
            m.id,
            m.label,
            format_context(m.max_tokens)
        );
    }

    println!("\n{} model(s) listed", filtered.len());
}

/// Run the `check` command: build a model handle (no request is sent).
pub fn run_check(
    ctx: &CommandContext,
    provider: &str,
    model: &str,
    api_key: Option<String>,
    base_url: Option<String>,
) {
    let p = ctx.provider(provider);
    let explicit = explicit_values(Some(p), api_key, base_url);
    match p.get_model(model, &ctx.sources(&explicit)) {
        Ok(handle) => println!(
            "Ready: {} / {} at {}",
            handle.provider(),
            handle.model_id(),
            handle.base_url()
        ),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::provider::minimax::MiniMaxProvider;
    use secrecy::ExposeSecret;

    #[test]
    fn format_context_units() {
        assert_eq!(format_context(2048), "2k");
        assert_eq!(format_context(1_000_000), "1.0M");
        assert_eq!(format_context(512), "512");
    }

    #[test]
    fn interrupt_cancels_listing_then_exits() {
        let listing = CancellationToken::new();
        assert!(!interrupt_exits(&listing));
        assert!(listing.is_cancelled());
        assert!(interrupt_exits(&listing));
    }

    #[test]
    fn interrupt_after_listing_finished_exits() {
        let listing = CancellationToken::new();
        listing.cancel();
        assert!(interrupt_exits(&listing));
    }

    #[test]
    fn explicit_values_use_canonical_provider_name() {
        let explicit = explicit_values(
            Some(&MiniMaxProvider),
            Some("k1".to_string()),
            Some("https://proxy/v1".to_string()),
        );
        let sources = ConfigurationSources {
            explicit: Some(&explicit),
            ..Default::default()
        };
        let endpoint = MiniMaxProvider.resolve(&sources);
        assert_eq!(endpoint.base_url, "https://proxy/v1");
        assert_eq!(
            endpoint.credential.as_ref().map(|c| c.expose_secret()),
            Some("k1")
        );
    }
}
