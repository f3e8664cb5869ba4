// NetCommand - Error Types
// SPDX-License-Identifier: MIT

//! Shared error types.
//!
//! Most failures in this tool are absorbed where they happen and turned
//! into a [`StepOutcome`](super::outcome::StepOutcome) or a sentinel value.
//! The variants here cover the few paths that do propagate: input
//! validation, configuration I/O, and the one business-level geolocation
//! failure that is allowed to reach the top-level fatal handler.

use thiserror::Error;

/// Result type alias for NetCommand operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for NetCommand operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid DNS server: {0}")]
    InvalidDnsServer(String),

    /// The geolocation service answered but reported its own failure
    /// (`status != "success"`). Carries the service's message.
    #[error("IP lookup failed: {0}")]
    Lookup(String),

    #[error("Reverse geocoding requires an API key; set OPENCAGE_API_KEY or geocode_api_key in settings")]
    MissingGeocodeKey,

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Failed to parse configuration: {0}")]
    ConfigParseFailed(String),

    #[error("Failed to write configuration: {0}")]
    ConfigWriteFailed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

// Convert from toml parse errors
impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::ConfigParseFailed(err.to_string())
    }
}

// Convert from toml serialize errors
impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Error::ConfigWriteFailed(err.to_string())
    }
}
