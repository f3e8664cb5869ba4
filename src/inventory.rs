// NetCommand - Adapter Inventory
// SPDX-License-Identifier: MIT

//! Network adapter enumeration.
//!
//! Queries the OS for adapters in JSON form and normalizes the output into
//! an ordered list of [`Adapter`] snapshots. Enumeration never fails loudly:
//! a command error or unparsable response yields an empty list, which
//! callers must treat as "no adapters known" and re-query on demand.

use serde::Deserialize;
use tracing::debug;

use crate::command::{Cmd, Execute};
use crate::models::{Adapter, LinkStatus};

/// PowerShell pipeline requesting the adapter fields we model, as JSON.
const ENUMERATE_PIPELINE: &str =
    "Get-NetAdapter | Select-Object Name, InterfaceDescription, Status, MacAddress | ConvertTo-Json";

/// Build the adapter enumeration command.
pub fn enumerate_command() -> Cmd {
    Cmd::new("powershell")
        .arg("-NoProfile")
        .arg("-Command")
        .arg(ENUMERATE_PIPELINE)
}

/// Adapter record as emitted by the enumeration command.
#[derive(Debug, Deserialize)]
struct RawAdapter {
    #[serde(rename = "Name", default)]
    name: Option<String>,
    #[serde(rename = "InterfaceDescription", default)]
    description: Option<String>,
    #[serde(rename = "Status", default)]
    status: Option<String>,
    #[serde(rename = "MacAddress", default)]
    mac_address: Option<String>,
}

impl From<RawAdapter> for Adapter {
    fn from(raw: RawAdapter) -> Self {
        Adapter {
            name: raw.name.unwrap_or_else(|| "Unknown".to_string()),
            description: raw.description.unwrap_or_default(),
            status: LinkStatus::parse(raw.status.as_deref().unwrap_or("")),
            mac_address: raw.mac_address.unwrap_or_default(),
        }
    }
}

/// Parse the enumeration output, normalizing the single-object vs array
/// ambiguity: one adapter serializes as a bare object, several as an array.
pub fn parse_adapter_json(raw: &str) -> Vec<Adapter> {
    let value: serde_json::Value = match serde_json::from_str(raw) {
        Ok(v) => v,
        Err(e) => {
            debug!("Adapter enumeration output not valid JSON: {}", e);
            return Vec::new();
        }
    };

    let items = match value {
        serde_json::Value::Array(items) => items,
        obj @ serde_json::Value::Object(_) => vec![obj],
        _ => return Vec::new(),
    };

    items
        .into_iter()
        .filter_map(|item| serde_json::from_value::<RawAdapter>(item).ok())
        .map(Adapter::from)
        .collect()
}

/// List all network adapters known to the OS right now.
pub async fn list_adapters<E: Execute>(runner: &E) -> Vec<Adapter> {
    let output = runner.run(enumerate_command()).await;
    if !output.success() || output.stdout.is_empty() {
        debug!(
            "Adapter enumeration returned no data (exit {})",
            output.exit_code()
        );
        return Vec::new();
    }
    parse_adapter_json(&output.stdout)
}
