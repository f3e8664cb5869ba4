// NetCommand - Adapter Model
// SPDX-License-Identifier: MIT

//! Network adapter snapshot types.
//!
//! Adapters are immutable snapshots of the OS enumeration output, re-fetched
//! on demand and never persisted. Identity is the OS-assigned `name`.

use serde::{Deserialize, Serialize};

/// Link status of a network adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LinkStatus {
    /// Adapter is up and passing traffic.
    Up,
    /// Adapter is administratively down.
    Down,
    /// Adapter is enabled but has no link.
    Disconnected,
    /// Status string not recognized.
    #[default]
    Unknown,
}

impl LinkStatus {
    /// Parse the OS status string, case-insensitively.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "up" => Self::Up,
            "down" => Self::Down,
            "disconnected" => Self::Disconnected,
            _ => Self::Unknown,
        }
    }

    pub fn is_up(&self) -> bool {
        matches!(self, Self::Up)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Up => "Up",
            Self::Down => "Down",
            Self::Disconnected => "Disconnected",
            Self::Unknown => "Unknown",
        }
    }
}

impl std::fmt::Display for LinkStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

/// One network adapter as reported by the OS enumeration command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Adapter {
    /// OS-assigned interface name (unique per session).
    pub name: String,
    /// Hardware/driver description.
    pub description: String,
    /// Link status at enumeration time.
    pub status: LinkStatus,
    /// Hardware MAC address (may be empty for virtual adapters).
    pub mac_address: String,
}

impl Adapter {
    /// One-line display label for listings.
    #[allow(dead_code)]
    pub fn display_label(&self) -> String {
        if self.description.is_empty() {
            format!("{} [{}]", self.name, self.status)
        } else {
            format!("{} [{}] - {}", self.name, self.status, self.description)
        }
    }
}
