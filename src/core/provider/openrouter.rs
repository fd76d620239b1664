//! OpenRouter: aggregated OpenAI-compatible gateway. Its `/models` listing reports
//! `context_length` for every entry.

use super::{DEFAULT_LISTING_TIMEOUT, Provider, ProviderDescriptor};
use crate::core::models::{ModelDescriptor, StaticModel, static_descriptors};

pub const OPENROUTER: ProviderDescriptor = ProviderDescriptor {
    name: "OpenRouter",
    default_base_url: "https://openrouter.ai/api/v1",
    base_url_key: "OPENROUTER_BASE_URL",
    api_key_key: "OPENROUTER_API_KEY",
    icon: "i-simple-icons-openrouter",
    api_key_link: "https://openrouter.ai/settings/keys",
    api_key_link_label: "Get OpenRouter API Key",
    fallback_max_tokens: 128_000,
    listing_timeout: DEFAULT_LISTING_TIMEOUT,
};

const STATIC_MODELS: &[StaticModel] = &[
    ("anthropic/claude-haiku-4.5", "Claude Haiku 4.5", 200_000),
    ("openai/gpt-4o-mini", "GPT-4o mini", 128_000),
];

pub struct OpenRouterProvider;

impl Provider for OpenRouterProvider {
    fn descriptor(&self) -> &ProviderDescriptor {
        &OPENROUTER
    }

    fn static_models(&self) -> Vec<ModelDescriptor> {
        static_descriptors(OPENROUTER.name, STATIC_MODELS)
    }
}
