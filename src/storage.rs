// NetCommand - Settings Storage
// SPDX-License-Identifier: MIT

//! Settings persistence.
//!
//! The settings file lives under the platform config dir
//! (`netcommand/settings.toml`). A missing or unreadable file falls back to
//! defaults; the OPENCAGE_API_KEY environment variable overrides whatever
//! key the file carries, so the credential never has to be written to disk.

use std::path::PathBuf;

use tracing::{info, warn};

use crate::models::{AppConfig, Result, CONFIG_DIR_NAME};

/// Environment variable overriding the reverse-geocoding API key.
pub const GEOCODE_KEY_ENV: &str = "OPENCAGE_API_KEY";

/// Path of the settings file.
pub fn settings_file() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CONFIG_DIR_NAME)
        .join("settings.toml")
}

/// Apply the environment override for the geocoding key.
fn apply_key_override(config: &mut AppConfig, key: Option<String>) {
    if let Some(key) = key.filter(|k| !k.trim().is_empty()) {
        config.geocode_api_key = Some(key);
    }
}

/// Load the effective configuration: settings file if present, defaults
/// otherwise, environment override applied last.
pub fn load_config() -> AppConfig {
    let path = settings_file();
    let mut config = if path.exists() {
        match AppConfig::load_from_file(&path) {
            Ok(config) => {
                info!("Loaded settings from {:?}", path);
                config
            }
            Err(e) => {
                warn!("Failed to load settings from {:?}: {}", path, e);
                AppConfig::default()
            }
        }
    } else {
        AppConfig::default()
    };

    apply_key_override(&mut config, std::env::var(GEOCODE_KEY_ENV).ok());
    config
}

/// Write the default settings file if none exists yet. Returns the path.
pub fn init_settings_file() -> Result<PathBuf> {
    let path = settings_file();
    if !path.exists() {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                let _ = std::fs::set_permissions(dir, std::fs::Permissions::from_mode(0o700));
            }
        }
        AppConfig::default().save_to_file(&path)?;
        info!("Wrote default settings to {:?}", path);
    }
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_override_wins_over_file_key() {
        let mut config = AppConfig {
            geocode_api_key: Some("from-file".to_string()),
            ..AppConfig::default()
        };
        apply_key_override(&mut config, Some("from-env".to_string()));
        assert_eq!(config.geocode_api_key.as_deref(), Some("from-env"));
    }

    #[test]
    fn absent_or_blank_env_keeps_file_key() {
        let mut config = AppConfig {
            geocode_api_key: Some("from-file".to_string()),
            ..AppConfig::default()
        };
        apply_key_override(&mut config, None);
        assert_eq!(config.geocode_api_key.as_deref(), Some("from-file"));

        apply_key_override(&mut config, Some("   ".to_string()));
        assert_eq!(config.geocode_api_key.as_deref(), Some("from-file"));
    }
}
