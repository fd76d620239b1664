//! MiniMax: OpenAI-compatible chat models at api.minimax.io.

use super::{DEFAULT_FALLBACK_MAX_TOKENS, DEFAULT_LISTING_TIMEOUT, Provider, ProviderDescriptor};
use crate::core::models::{ModelDescriptor, StaticModel, static_descriptors};

pub const MINIMAX: ProviderDescriptor = ProviderDescriptor {
    name: "MiniMax",
    default_base_url: "https://api.minimax.io/v1",
    base_url_key: "MINIMAX_BASE_URL",
    api_key_key: "MINIMAX_API_KEY",
    icon: "i-ph-brain-duotone",
    api_key_link: "https://www.minimax.io/platform/app-setting/api-key",
    api_key_link_label: "Get MiniMax API Key",
    fallback_max_tokens: DEFAULT_FALLBACK_MAX_TOKENS,
    listing_timeout: DEFAULT_LISTING_TIMEOUT,
};

const STATIC_MODELS: &[StaticModel] = &[
    ("MiniMax-M1", "MiniMax-M1 (Reasoning Model)", 8192),
    ("MiniMax-Text-01", "MiniMax-Text-01", 2048),
];

pub struct MiniMaxProvider;

impl Provider for MiniMaxProvider {
    fn descriptor(&self) -> &ProviderDescriptor {
        &MINIMAX
    }

    fn static_models(&self) -> Vec<ModelDescriptor> {
        static_descriptors(MINIMAX.name, STATIC_MODELS)
    }
}
