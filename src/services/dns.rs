// NetCommand - DNS Configuration
// SPDX-License-Identifier: MIT

//! Per-adapter DNS configuration and resolver cache control.

use std::net::IpAddr;

use tracing::{debug, info};

use crate::command::{Cmd, Execute};
use crate::models::{BestEffort, Error, Result, StepOutcome};

/// Build the command setting the static primary resolver on an adapter.
pub fn set_primary_command(adapter: &str, server: IpAddr) -> Cmd {
    Cmd::new("netsh")
        .args(["interface", "ip", "set", "dns"])
        .arg(format!("name={}", adapter))
        .arg("source=static")
        .arg(format!("addr={}", server))
        .arg("register=primary")
}

/// Build the command adding the index-2 resolver on an adapter.
pub fn add_secondary_command(adapter: &str, server: IpAddr) -> Cmd {
    Cmd::new("netsh")
        .args(["interface", "ip", "add", "dns"])
        .arg(format!("name={}", adapter))
        .arg(format!("addr={}", server))
        .arg("index=2")
}

/// Build the command reverting an adapter to DHCP-assigned DNS.
pub fn clear_command(adapter: &str) -> Cmd {
    Cmd::new("netsh")
        .args(["interface", "ip", "set", "dns"])
        .arg(format!("name={}", adapter))
        .arg("source=dhcp")
}

/// Build the OS-wide resolver cache flush command.
pub fn flush_command() -> Cmd {
    Cmd::new("ipconfig").arg("/flushdns")
}

fn parse_server(raw: &str) -> Result<IpAddr> {
    raw.trim()
        .parse()
        .map_err(|_| Error::InvalidDnsServer(raw.to_string()))
}

/// DNS configuration service.
pub struct DnsControl<E: Execute> {
    runner: E,
}

impl<E: Execute> DnsControl<E> {
    pub fn new(runner: E) -> Self {
        Self { runner }
    }

    /// Set a static primary resolver on `adapter`, and optionally a
    /// best-effort secondary. The secondary is only attempted after the
    /// primary command succeeds; its failure is recorded but not fatal.
    ///
    /// Server strings are validated as IP addresses before any command is
    /// issued.
    pub async fn set_dns(
        &self,
        adapter: &str,
        primary: &str,
        secondary: Option<&str>,
    ) -> Result<BestEffort> {
        let primary_addr = parse_server(primary)?;
        let secondary_addr = secondary
            .filter(|s| !s.trim().is_empty())
            .map(parse_server)
            .transpose()?;

        let output = self
            .runner
            .run(set_primary_command(adapter, primary_addr))
            .await;
        if !output.success() {
            return Ok(BestEffort::primary_only(StepOutcome::error(
                format!("Failed to set DNS on {}", adapter),
                output.failure_reason(),
            )));
        }
        info!("Primary DNS on {} set to {}", adapter, primary_addr);
        let primary_outcome =
            StepOutcome::success(format!("DNS on {} set to {}", adapter, primary_addr));

        let secondary_outcome = match secondary_addr {
            None => None,
            Some(addr) => {
                let output = self.runner.run(add_secondary_command(adapter, addr)).await;
                Some(if output.success() {
                    StepOutcome::success(format!("Secondary DNS set to {}", addr))
                } else {
                    debug!(
                        "Secondary DNS on {} failed (best-effort): {}",
                        adapter,
                        output.failure_reason()
                    );
                    StepOutcome::error(
                        format!("Failed to add secondary DNS {}", addr),
                        output.failure_reason(),
                    )
                })
            }
        };

        Ok(BestEffort {
            primary: primary_outcome,
            secondary: secondary_outcome,
        })
    }

    /// Revert `adapter` to DHCP-assigned DNS.
    pub async fn clear_dns(&self, adapter: &str) -> StepOutcome {
        let output = self.runner.run(clear_command(adapter)).await;
        if output.success() {
            info!("DNS on {} reset to DHCP", adapter);
            StepOutcome::success(format!("DNS on {} reset to DHCP", adapter))
        } else {
            StepOutcome::error(
                format!("Failed to reset DNS on {}", adapter),
                output.failure_reason(),
            )
        }
    }

    /// Flush the OS-wide resolver cache.
    pub async fn flush_dns(&self) -> StepOutcome {
        let output = self.runner.run(flush_command()).await;
        if output.success() {
            StepOutcome::success("DNS cache flushed")
        } else {
            StepOutcome::error("Failed to flush DNS cache", output.failure_reason())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::mock::ScriptedRunner;
    use crate::command::CommandOutput;

    #[test]
    fn command_shapes() {
        let primary = set_primary_command("Wi-Fi", "8.8.8.8".parse().unwrap());
        assert_eq!(primary.program, "netsh");
        assert_eq!(
            primary.args,
            vec![
                "interface",
                "ip",
                "set",
                "dns",
                "name=Wi-Fi",
                "source=static",
                "addr=8.8.8.8",
                "register=primary"
            ]
        );

        let secondary = add_secondary_command("Wi-Fi", "8.8.4.4".parse().unwrap());
        assert_eq!(
            secondary.args,
            vec!["interface", "ip", "add", "dns", "name=Wi-Fi", "addr=8.8.4.4", "index=2"]
        );

        let clear = clear_command("Wi-Fi");
        assert_eq!(
            clear.args,
            vec!["interface", "ip", "set", "dns", "name=Wi-Fi", "source=dhcp"]
        );

        assert_eq!(flush_command().display_line(), "ipconfig /flushdns");
    }

    #[tokio::test]
    async fn no_secondary_means_no_secondary_command() {
        let control = DnsControl::new(ScriptedRunner::all_ok());
        let result = control.set_dns("Ethernet", "8.8.8.8", None).await.unwrap();
        assert!(result.is_success());
        assert!(result.secondary.is_none());
        assert_eq!(control.runner.calls().len(), 1);
    }

    #[tokio::test]
    async fn secondary_issued_only_after_primary_succeeds() {
        let control = DnsControl::new(ScriptedRunner::all_ok());
        let result = control
            .set_dns("Ethernet", "1.1.1.1", Some("1.0.0.1"))
            .await
            .unwrap();
        assert!(result.is_success());
        assert!(result.secondary.unwrap().is_success());

        let calls = control.runner.calls();
        assert_eq!(calls.len(), 2);
        assert!(calls[1].args.contains(&"index=2".to_string()));
    }

    #[tokio::test]
    async fn primary_failure_skips_secondary() {
        let control = DnsControl::new(ScriptedRunner::with(|_| {
            CommandOutput::exited(1, "", "The parameter is incorrect.")
        }));
        let result = control
            .set_dns("Ethernet", "1.1.1.1", Some("1.0.0.1"))
            .await
            .unwrap();
        assert!(!result.is_success());
        assert!(result.secondary.is_none());
        assert!(result
            .primary
            .display_line()
            .contains("parameter is incorrect"));
        assert_eq!(control.runner.calls().len(), 1);
    }

    #[tokio::test]
    async fn secondary_failure_does_not_taint_result() {
        let control = DnsControl::new(ScriptedRunner::with(|cmd| {
            if cmd.args.contains(&"index=2".to_string()) {
                CommandOutput::exited(1, "", "rejected")
            } else {
                CommandOutput::exited(0, "", "")
            }
        }));
        let result = control
            .set_dns("Ethernet", "8.8.8.8", Some("8.8.4.4"))
            .await
            .unwrap();
        assert!(result.is_success());
        assert!(!result.secondary.unwrap().is_success());
    }

    #[tokio::test]
    async fn invalid_server_fails_before_any_command() {
        let control = DnsControl::new(ScriptedRunner::all_ok());
        let err = control
            .set_dns("Ethernet", "not-an-ip", None)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidDnsServer(_)));
        assert!(control.runner.calls().is_empty());

        let err = control
            .set_dns("Ethernet", "8.8.8.8", Some("bogus"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidDnsServer(_)));
        assert!(control.runner.calls().is_empty());
    }

    #[tokio::test]
    async fn blank_secondary_is_treated_as_absent() {
        let control = DnsControl::new(ScriptedRunner::all_ok());
        let result = control
            .set_dns("Ethernet", "8.8.8.8", Some("  "))
            .await
            .unwrap();
        assert!(result.secondary.is_none());
        assert_eq!(control.runner.calls().len(), 1);
    }
}
