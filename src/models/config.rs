// NetCommand - Application Configuration
// SPDX-License-Identifier: MIT

//! Application configuration model.

use serde::{Deserialize, Serialize};

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Target for connectivity probes.
    #[serde(default = "default_probe_target")]
    pub probe_target: String,

    /// Number of echoes per probe.
    #[serde(default = "default_probe_count")]
    pub probe_count: u32,

    /// Per-echo timeout in milliseconds.
    #[serde(default = "default_probe_timeout_ms")]
    pub probe_timeout_ms: u32,

    /// Status refresh interval in seconds.
    #[serde(default = "default_status_interval")]
    pub status_interval_secs: u64,

    /// Upper bound on spawned command runtime in seconds.
    #[serde(default = "default_command_timeout")]
    pub command_timeout_secs: u64,

    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// OpenCage reverse-geocoding API key. Supplied via this file or the
    /// OPENCAGE_API_KEY environment variable, never compiled in.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geocode_api_key: Option<String>,
}

fn default_probe_target() -> String {
    "8.8.8.8".to_string()
}

fn default_probe_count() -> u32 {
    2
}

fn default_probe_timeout_ms() -> u32 {
    1000
}

fn default_status_interval() -> u64 {
    15
}

fn default_command_timeout() -> u64 {
    30
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            probe_target: default_probe_target(),
            probe_count: default_probe_count(),
            probe_timeout_ms: default_probe_timeout_ms(),
            status_interval_secs: default_status_interval(),
            command_timeout_secs: default_command_timeout(),
            log_level: default_log_level(),
            geocode_api_key: None,
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load_from_file(path: &std::path::Path) -> Result<Self, super::Error> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a TOML file with restrictive permissions —
    /// the file may contain an API credential.
    pub fn save_to_file(&self, path: &std::path::Path) -> Result<(), super::Error> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let _ = std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_yields_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config.probe_target, "8.8.8.8");
        assert_eq!(config.probe_count, 2);
        assert_eq!(config.probe_timeout_ms, 1000);
        assert_eq!(config.status_interval_secs, 15);
        assert_eq!(config.geocode_api_key, None);
    }

    #[test]
    fn partial_toml_keeps_remaining_defaults() {
        let config: AppConfig = toml::from_str(
            "probe_target = \"1.1.1.1\"\nstatus_interval_secs = 30\n",
        )
        .unwrap();
        assert_eq!(config.probe_target, "1.1.1.1");
        assert_eq!(config.status_interval_secs, 30);
        assert_eq!(config.probe_count, 2);
    }

    #[test]
    fn missing_key_is_not_serialized() {
        let rendered = toml::to_string_pretty(&AppConfig::default()).unwrap();
        assert!(!rendered.contains("geocode_api_key"));
    }
}
