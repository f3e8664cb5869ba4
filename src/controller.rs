// NetCommand - Network Controller
// SPDX-License-Identifier: MIT

//! Serialized front door for adapter-mutating operations.
//!
//! The OS serializes conflicting configuration commands, but two overlapping
//! callers could still interleave multi-step policies (a prioritization run
//! racing a DNS change). All mutating operations therefore pass through a
//! single mutation gate here; read-only queries bypass it.

use tokio::sync::Mutex;

use crate::command::Execute;
use crate::inventory;
use crate::models::{Adapter, BestEffort, Result, StepOutcome};
use crate::services::{DnsControl, LeaseControl, RouteControl};
use crate::services::routing::PrioritizeReport;

/// Owns the configuration services and the mutation gate.
pub struct Controller<E: Execute + Clone> {
    runner: E,
    routes: RouteControl<E>,
    dns: DnsControl<E>,
    leases: LeaseControl<E>,
    gate: Mutex<()>,
}

impl<E: Execute + Clone> Controller<E> {
    pub fn new(runner: E) -> Self {
        Self {
            routes: RouteControl::new(runner.clone()),
            dns: DnsControl::new(runner.clone()),
            leases: LeaseControl::new(runner.clone()),
            runner,
            gate: Mutex::new(()),
        }
    }

    /// List adapters as the OS reports them right now. Read-only.
    pub async fn adapters(&self) -> Vec<Adapter> {
        inventory::list_adapters(&self.runner).await
    }

    pub async fn prioritize(&self, target: &str) -> PrioritizeReport {
        let _gate = self.gate.lock().await;
        self.routes.prioritize(target).await
    }

    pub async fn set_dns(
        &self,
        adapter: &str,
        primary: &str,
        secondary: Option<&str>,
    ) -> Result<BestEffort> {
        let _gate = self.gate.lock().await;
        self.dns.set_dns(adapter, primary, secondary).await
    }

    pub async fn clear_dns(&self, adapter: &str) -> StepOutcome {
        let _gate = self.gate.lock().await;
        self.dns.clear_dns(adapter).await
    }

    pub async fn flush_dns(&self) -> StepOutcome {
        let _gate = self.gate.lock().await;
        self.dns.flush_dns().await
    }

    pub async fn release_lease(&self, adapter: Option<&str>) -> StepOutcome {
        let _gate = self.gate.lock().await;
        self.leases.release(adapter).await
    }

    pub async fn renew_lease(&self, adapter: Option<&str>) -> StepOutcome {
        let _gate = self.gate.lock().await;
        self.leases.renew(adapter).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::mock::ScriptedRunner;
    use crate::command::CommandOutput;
    use std::sync::Arc;

    #[tokio::test]
    async fn controller_routes_operations_to_services() {
        let controller = Controller::new(Arc::new(ScriptedRunner::all_ok()));
        let outcome = controller.flush_dns().await;
        assert!(outcome.is_success());

        let outcome = controller.renew_lease(Some("Ethernet")).await;
        assert!(outcome.is_success());

        let calls = controller.runner.calls();
        assert_eq!(calls[0].display_line(), "ipconfig /flushdns");
        assert_eq!(calls[1].display_line(), "ipconfig /renew Ethernet");
    }

    #[tokio::test]
    async fn adapters_query_does_not_take_the_gate() {
        let controller = Controller::new(Arc::new(ScriptedRunner::with(|_| {
            CommandOutput::exited(0, r#"{"Name": "Ethernet", "Status": "Up"}"#, "")
        })));
        // Hold the gate and verify reads still complete.
        let _held = controller.gate.lock().await;
        let adapters = controller.adapters().await;
        assert_eq!(adapters.len(), 1);
    }
}
