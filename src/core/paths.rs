//! Centralized path helpers for the config directory.

use std::path::PathBuf;

use crate::core::app;
use crate::core::config::EnvSnapshot;

/// Overrides the config directory (used by tests and portable installs).
pub const CONFIG_DIR_ENV: &str = "PROVIDER_KIT_CONFIG_DIR";

/// Project directories from the standard platform locations.
pub fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("io", app::VENDOR, app::NAME)
}

/// Config directory (~/.config/provider-kit/), or `PROVIDER_KIT_CONFIG_DIR` when set.
pub fn config_dir(env: &EnvSnapshot) -> Option<PathBuf> {
    if let Some(dir) = env.get(CONFIG_DIR_ENV).filter(|d| !d.trim().is_empty()) {
        return Some(PathBuf::from(dir));
    }
    project_dirs().map(|d| d.config_dir().to_path_buf())
}
