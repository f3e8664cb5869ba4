// NetCommand - DHCP Lease Control
// SPDX-License-Identifier: MIT

//! DHCP lease release and renewal.
//!
//! The underlying tool reports free-form text, so both operations surface
//! only success or failure. An omitted adapter name targets all adapters.

use tracing::info;

use crate::command::{Cmd, Execute};
use crate::models::StepOutcome;

fn lease_command(verb: &str, adapter: Option<&str>) -> Cmd {
    let cmd = Cmd::new("ipconfig").arg(verb);
    match adapter.filter(|a| !a.trim().is_empty()) {
        Some(name) => cmd.arg(name),
        None => cmd,
    }
}

/// Build the lease release command.
pub fn release_command(adapter: Option<&str>) -> Cmd {
    lease_command("/release", adapter)
}

/// Build the lease renew command.
pub fn renew_command(adapter: Option<&str>) -> Cmd {
    lease_command("/renew", adapter)
}

fn scope_label(adapter: Option<&str>) -> String {
    match adapter.filter(|a| !a.trim().is_empty()) {
        Some(name) => name.to_string(),
        None => "all adapters".to_string(),
    }
}

/// DHCP lease control service.
pub struct LeaseControl<E: Execute> {
    runner: E,
}

impl<E: Execute> LeaseControl<E> {
    pub fn new(runner: E) -> Self {
        Self { runner }
    }

    /// Release the DHCP lease, globally or for one adapter.
    pub async fn release(&self, adapter: Option<&str>) -> StepOutcome {
        let output = self.runner.run(release_command(adapter)).await;
        if output.success() {
            info!("Lease released on {}", scope_label(adapter));
            StepOutcome::success(format!("IP released ({})", scope_label(adapter)))
        } else {
            StepOutcome::error(
                format!("Failed to release lease on {}", scope_label(adapter)),
                output.failure_reason(),
            )
        }
    }

    /// Renew the DHCP lease, globally or for one adapter.
    pub async fn renew(&self, adapter: Option<&str>) -> StepOutcome {
        let output = self.runner.run(renew_command(adapter)).await;
        if output.success() {
            info!("Lease renewed on {}", scope_label(adapter));
            StepOutcome::success(format!("IP renewed ({})", scope_label(adapter)))
        } else {
            StepOutcome::error(
                format!("Failed to renew lease on {}", scope_label(adapter)),
                output.failure_reason(),
            )
        }
    }
}
