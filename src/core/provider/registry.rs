//! The fixed set of built-in providers.

use super::Provider;
use super::minimax::MiniMaxProvider;
use super::openrouter::OpenRouterProvider;
use crate::core::settings::PersistedSettings;

pub struct ProviderRegistry {
    providers: Vec<Box<dyn Provider>>,
}

impl ProviderRegistry {
    /// All built-in providers, in display order.
    pub fn builtin() -> Self {
        Self {
            providers: vec![Box::new(MiniMaxProvider), Box::new(OpenRouterProvider)],
        }
    }

    /// Look up a provider by name (case-insensitive).
    pub fn get(&self, name: &str) -> Option<&dyn Provider> {
        self.iter().find(|p| p.name().eq_ignore_ascii_case(name))
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn Provider> {
        self.providers.iter().map(|p| p.as_ref())
    }

    /// Providers not disabled in persisted settings.
    pub fn enabled<'a>(
        &'a self,
        settings: &'a PersistedSettings,
    ) -> impl Iterator<Item = &'a dyn Provider> {
        self.iter().filter(|p| settings.is_enabled(p.name()))
    }
}
