//! Persisted per-provider settings, read from `providers.json` in the config directory.
//!
//! The file maps provider names to key/value pairs keyed by the provider's
//! configured key names, plus an optional `enabled` flag:
//!
//! ```json
//! { "MiniMax": { "enabled": true, "MINIMAX_BASE_URL": "https://api.minimax.io/v1" } }
//! ```
//!
//! Settings are only ever read here; writing them belongs to the hosting application.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::core::config::EnvSnapshot;
use crate::core::paths;

/// File name of the settings file inside the config directory.
pub const SETTINGS_FILE: &str = "providers.json";

/// Errors when loading persisted settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Failed to read {}: {source}", .path.display())]
    Io { path: PathBuf, source: io::Error },
    #[error("Invalid provider settings in {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Settings for one provider.
#[derive(Clone, Default, Deserialize)]
pub struct ProviderSettings {
    #[serde(default)]
    pub enabled: Option<bool>,
    #[serde(flatten)]
    values: HashMap<String, String>,
}

impl ProviderSettings {
    /// Value stored under a configured key name (e.g. `MINIMAX_API_KEY`).
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Providers are enabled unless explicitly disabled.
    pub fn is_enabled(&self) -> bool {
        self.enabled.unwrap_or(true)
    }
}

// Values may hold credentials: only key names are printed.
impl fmt::Debug for ProviderSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<&str> = self.values.keys().map(String::as_str).collect();
        keys.sort_unstable();
        f.debug_struct("ProviderSettings")
            .field("enabled", &self.enabled)
            .field("keys", &keys)
            .finish()
    }
}

/// All persisted provider settings, keyed by provider name.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(transparent)]
pub struct PersistedSettings {
    providers: HashMap<String, ProviderSettings>,
}

impl PersistedSettings {
    /// Settings for a provider. Exact name match first, then case-insensitive.
    pub fn for_provider(&self, name: &str) -> Option<&ProviderSettings> {
        self.providers.get(name).or_else(|| {
            self.providers
                .iter()
                .find(|(k, _)| k.eq_ignore_ascii_case(name))
                .map(|(_, v)| v)
        })
    }

    pub fn is_enabled(&self, name: &str) -> bool {
        self.for_provider(name).is_none_or(ProviderSettings::is_enabled)
    }
}

/// Load settings from an explicit path. A missing or blank file yields empty settings.
pub fn load_settings_from(path: &Path) -> Result<PersistedSettings, SettingsError> {
    let data = match fs::read_to_string(path) {
        Ok(data) => data,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(PersistedSettings::default()),
        Err(source) => {
            return Err(SettingsError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    if data.trim().is_empty() {
        return Ok(PersistedSettings::default());
    }
    serde_json::from_str(&data).map_err(|source| SettingsError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Load settings from `<config dir>/providers.json`.
pub fn load_settings(env: &EnvSnapshot) -> Result<PersistedSettings, SettingsError> {
    match paths::config_dir(env) {
        Some(dir) => load_settings_from(&dir.join(SETTINGS_FILE)),
        None => Ok(PersistedSettings::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_empty_settings() {
        let dir = tempfile::tempdir().unwrap();
        let settings = load_settings_from(&dir.path().join(SETTINGS_FILE)).unwrap();
        assert!(settings.for_provider("MiniMax").is_none());
        assert!(settings.is_enabled("MiniMax"));
    }

    #[test]
    fn loads_values_and_enabled_flag() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE);
        fs::write(
            &path,
            r#"{
                "MiniMax": { "MINIMAX_BASE_URL": "https://proxy.local/v1", "MINIMAX_API_KEY": "k2" },
                "OpenRouter": { "enabled": false }
            }"#,
        )
        .unwrap();

        let settings = load_settings_from(&path).unwrap();
        let minimax = settings.for_provider("minimax").expect("case-insensitive lookup");
        assert_eq!(minimax.get("MINIMAX_BASE_URL"), Some("https://proxy.local/v1"));
        assert_eq!(minimax.get("MINIMAX_API_KEY"), Some("k2"));
        assert!(settings.is_enabled("MiniMax"));
        assert!(!settings.is_enabled("OpenRouter"));
    }

    #[test]
    fn invalid_json_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE);
        fs::write(&path, "{ not json").unwrap();
        let err = load_settings_from(&path).unwrap_err();
        assert!(matches!(err, SettingsError::Json { .. }));
    }

    #[test]
    fn debug_output_hides_values() {
        let settings: ProviderSettings =
            serde_json::from_str(r#"{ "MINIMAX_API_KEY": "super-secret" }"#).unwrap();
        let printed = format!("{:?}", settings);
        assert!(printed.contains("MINIMAX_API_KEY"));
        assert!(!printed.contains("super-secret"));
    }
}
