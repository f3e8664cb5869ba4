// NetCommand - Route Prioritization
// SPDX-License-Identifier: MIT

//! Route metric control.
//!
//! Prioritizing an adapter is a two-step policy: promote the target to the
//! high-priority metric, then demote every other adapter that is currently
//! up to the background metric. Demotions are best-effort — disconnected
//! and virtual adapters commonly reject the change and that is expected.

use tracing::{debug, info};

use crate::command::{Cmd, Execute};
use crate::inventory;
use crate::models::{Adapter, StepOutcome, StepStatus};

/// Metric assigned to the prioritized adapter. Lower wins route selection.
pub const HIGH_PRIORITY_METRIC: u32 = 1;

/// Metric assigned to every other active adapter.
pub const BACKGROUND_METRIC: u32 = 100;

/// Build the route metric command for one adapter.
pub fn metric_command(adapter: &str, metric: u32) -> Cmd {
    Cmd::new("netsh")
        .args(["interface", "ip", "set", "interface"])
        .arg(adapter)
        .arg(format!("metric={}", metric))
}

/// Select the adapters to demote: every adapter that is up and is not the
/// target. Adapters that are not up are skipped to avoid noisy failures on
/// inactive hardware.
pub fn plan_demotions<'a>(adapters: &'a [Adapter], target: &str) -> Vec<&'a Adapter> {
    adapters
        .iter()
        .filter(|a| a.name != target && a.status.is_up())
        .collect()
}

/// Full account of one prioritization run.
///
/// The target outcome is what users see; demotion results are carried so
/// the caller drops them explicitly rather than losing them.
#[derive(Debug, Clone)]
pub struct PrioritizeReport {
    pub target: StepOutcome,
    pub demoted: Vec<(String, StepStatus)>,
}

impl PrioritizeReport {
    /// The user-facing account: target status line plus one line per
    /// demoted adapter.
    pub fn summary(&self) -> String {
        let mut lines = self.target.display_line();
        for (name, status) in &self.demoted {
            lines.push_str(&format!(
                "\n  {} -> background metric ({})",
                name,
                status.as_str()
            ));
        }
        lines
    }
}

/// Route prioritization service.
pub struct RouteControl<E: Execute> {
    runner: E,
}

impl<E: Execute> RouteControl<E> {
    pub fn new(runner: E) -> Self {
        Self { runner }
    }

    /// Promote `target` to the high-priority metric, then demote all other
    /// active adapters.
    pub async fn prioritize(&self, target: &str) -> PrioritizeReport {
        let output = self
            .runner
            .run(metric_command(target, HIGH_PRIORITY_METRIC))
            .await;

        let target_outcome = if output.success() {
            info!("{} set to high priority (metric {})", target, HIGH_PRIORITY_METRIC);
            StepOutcome::success(format!(
                "{} set to high priority (metric {})",
                target, HIGH_PRIORITY_METRIC
            ))
        } else {
            StepOutcome::error(
                format!("Failed to prioritize {}", target),
                output.failure_reason(),
            )
        };

        // Re-list after the promotion so demotions act on current state.
        let adapters = inventory::list_adapters(&self.runner).await;
        let mut demoted = Vec::new();
        for adapter in plan_demotions(&adapters, target) {
            let output = self
                .runner
                .run(metric_command(&adapter.name, BACKGROUND_METRIC))
                .await;
            let status = if output.success() {
                StepStatus::Success
            } else {
                debug!(
                    "Demotion of {} failed (expected for inactive hardware): {}",
                    adapter.name,
                    output.failure_reason()
                );
                StepStatus::Error
            };
            demoted.push((adapter.name.clone(), status));
        }

        PrioritizeReport {
            target: target_outcome,
            demoted,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::mock::ScriptedRunner;
    use crate::command::CommandOutput;
    use crate::models::LinkStatus;

    const ADAPTERS_JSON: &str = r#"[
        {"Name": "Ethernet", "Status": "Up"},
        {"Name": "Wi-Fi", "Status": "UP"},
        {"Name": "Bluetooth", "Status": "Disconnected"},
        {"Name": "vEthernet", "Status": "Down"}
    ]"#;

    fn adapter(name: &str, status: LinkStatus) -> Adapter {
        Adapter {
            name: name.into(),
            description: String::new(),
            status,
            mac_address: String::new(),
        }
    }

    #[test]
    fn metric_command_shape() {
        let cmd = metric_command("Ethernet 2", 1);
        assert_eq!(cmd.program, "netsh");
        assert_eq!(
            cmd.args,
            vec!["interface", "ip", "set", "interface", "Ethernet 2", "metric=1"]
        );
    }

    #[test]
    fn demotion_plan_skips_target_and_inactive_adapters() {
        let adapters = vec![
            adapter("Ethernet", LinkStatus::Up),
            adapter("Wi-Fi", LinkStatus::Up),
            adapter("Bluetooth", LinkStatus::Disconnected),
            adapter("vEthernet", LinkStatus::Down),
        ];
        let plan = plan_demotions(&adapters, "Ethernet");
        let names: Vec<_> = plan.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["Wi-Fi"]);
    }

    #[tokio::test]
    async fn prioritize_issues_exact_metric_calls() {
        let runner = ScriptedRunner::with(|cmd| {
            if cmd.program == "powershell" {
                CommandOutput::exited(0, ADAPTERS_JSON, "")
            } else {
                CommandOutput::exited(0, "Ok.", "")
            }
        });

        let report = RouteControl::new(runner).prioritize("Ethernet").await;
        assert!(report.target.is_success());
        assert_eq!(report.demoted, vec![("Wi-Fi".to_string(), StepStatus::Success)]);
    }

    #[tokio::test]
    async fn prioritize_metric_call_set_matches_up_adapters() {
        let control = RouteControl::new(ScriptedRunner::with(|cmd| {
            if cmd.program == "powershell" {
                CommandOutput::exited(0, ADAPTERS_JSON, "")
            } else {
                CommandOutput::exited(0, "", "")
            }
        }));
        control.prioritize("Ethernet").await;

        let calls = control.runner.calls();
        let high: Vec<_> = calls
            .iter()
            .filter(|c| c.args.contains(&"metric=1".to_string()))
            .collect();
        let background: Vec<_> = calls
            .iter()
            .filter(|c| c.args.contains(&"metric=100".to_string()))
            .collect();

        assert_eq!(high.len(), 1);
        assert!(high[0].args.contains(&"Ethernet".to_string()));
        assert_eq!(background.len(), 1);
        assert!(background[0].args.contains(&"Wi-Fi".to_string()));
        // Disconnected/down adapters get zero metric calls.
        assert!(!calls
            .iter()
            .any(|c| c.args.contains(&"Bluetooth".to_string())
                || c.args.contains(&"vEthernet".to_string())));
    }

    #[tokio::test]
    async fn failed_promotion_surfaces_reason() {
        let control = RouteControl::new(ScriptedRunner::with(|cmd| {
            if cmd.program == "powershell" {
                CommandOutput::exited(0, "[]", "")
            } else {
                CommandOutput::exited(1, "", "The requested operation requires elevation.")
            }
        }));
        let report = control.prioritize("Ethernet").await;
        assert!(!report.target.is_success());
        assert!(report.summary().contains("requires elevation"));
        assert!(report.demoted.is_empty());
    }
}
