// NetCommand - Diagnostic Status Types
// SPDX-License-Identifier: MIT

//! Connectivity and identity status types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Latency and loss readings from one connectivity probe.
///
/// Each field degrades to `None` independently; "unavailable" is a valid
/// terminal value, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ConnectivityStats {
    /// Average round-trip latency in milliseconds.
    pub latency_ms: Option<u32>,
    /// Packet loss percentage.
    pub loss_percent: Option<u32>,
}

impl ConnectivityStats {
    /// Both readings unavailable (probe failed or report unparsable).
    pub fn unavailable() -> Self {
        Self::default()
    }

    pub fn latency_display(&self) -> String {
        match self.latency_ms {
            Some(ms) => format!("{} ms", ms),
            None => "N/A".to_string(),
        }
    }

    pub fn loss_display(&self) -> String {
        match self.loss_percent {
            Some(pct) => format!("{}%", pct),
            None => "N/A".to_string(),
        }
    }
}

/// Public-IP identity record from the geolocation service.
///
/// Field names follow the ip-api.com response contract; treated as a
/// read-only external fact, re-fetched each cycle and never cached.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LocationInfo {
    /// The looked-up IP address (`query` on the wire).
    #[serde(default, rename = "query")]
    pub public_ip: String,
    #[serde(default)]
    pub country: String,
    #[serde(default, rename = "regionName")]
    pub region: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub isp: String,
    #[serde(default)]
    pub org: String,
    #[serde(default, rename = "as")]
    pub asn: String,
    #[serde(default)]
    pub lat: f64,
    #[serde(default)]
    pub lon: f64,
    #[serde(default)]
    pub timezone: String,
    /// Service-detected proxy/VPN flag.
    #[serde(default)]
    pub proxy: bool,
    /// Service-detected hosting/datacenter flag.
    #[serde(default)]
    pub hosting: bool,
}

impl LocationInfo {
    /// Qualitative anonymity verdict. Hosting dominates proxy.
    pub fn anonymity_verdict(&self) -> &'static str {
        if self.hosting {
            "HOSTING/DATACENTER"
        } else if self.proxy {
            "VPN/PROXY"
        } else {
            "NORMAL/RESIDENTIAL"
        }
    }

    /// "City, Country" display string.
    pub fn place_display(&self) -> String {
        format!("{}, {}", self.city, self.country)
    }
}

/// One complete, timestamped read of diagnostic and identity state.
///
/// Superseded wholesale by the next refresh cycle; a missing location stays
/// missing for its tick (no backfill from earlier snapshots).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusSnapshot {
    pub taken_at: DateTime<Utc>,
    pub connectivity: ConnectivityStats,
    pub location: Option<LocationInfo>,
}

impl StatusSnapshot {
    pub fn new(connectivity: ConnectivityStats, location: Option<LocationInfo>) -> Self {
        Self {
            taken_at: Utc::now(),
            connectivity,
            location,
        }
    }

    /// Multi-line rendering for the status display.
    pub fn render(&self) -> String {
        let mut lines = Vec::with_capacity(6);
        lines.push(format!(
            "[{}]",
            self.taken_at.format("%Y-%m-%d %H:%M:%S UTC")
        ));
        match &self.location {
            Some(loc) => {
                lines.push(format!("  Public IP   : {}", loc.public_ip));
                lines.push(format!("  Location    : {}", loc.place_display()));
                lines.push(format!("  ISP         : {}", loc.isp));
            }
            None => {
                lines.push("  Public IP   : Unavailable".to_string());
            }
        }
        lines.push(format!(
            "  Ping        : {}",
            self.connectivity.latency_display()
        ));
        lines.push(format!(
            "  Packet loss : {}",
            self.connectivity.loss_display()
        ));
        lines.join("\n")
    }
}
