// NetCommand - Connectivity Probing
// SPDX-License-Identifier: MIT

//! Reachability probing via the system ping tool.
//!
//! The ping report is plain text; latency and loss are extracted by two
//! independent pattern matches. Either reading degrades to `None` on its
//! own — a report with a parsable loss figure but no latency line still
//! yields a valid loss reading.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::command::{Cmd, Execute};
use crate::models::{AppConfig, ConnectivityStats};

static LATENCY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Average = (\d+)ms").expect("latency pattern"));

static LOSS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\((\d+)% loss\)").expect("loss pattern"));

/// Build the probe command: fixed echo count, bounded per-echo timeout.
pub fn ping_command(target: &str, count: u32, timeout_ms: u32) -> Cmd {
    Cmd::new("ping")
        .arg("-n")
        .arg(count.to_string())
        .arg("-w")
        .arg(timeout_ms.to_string())
        .arg(target)
}

/// Extract latency and loss from a ping report. Each field resolves
/// independently; an absent pattern yields `None` for that field only.
pub fn parse_ping_report(report: &str) -> ConnectivityStats {
    let capture_u32 = |re: &Regex| {
        re.captures(report)
            .and_then(|c| c.get(1))
            .and_then(|m| m.as_str().parse().ok())
    };
    ConnectivityStats {
        latency_ms: capture_u32(&LATENCY_RE),
        loss_percent: capture_u32(&LOSS_RE),
    }
}

/// Connectivity probing service.
pub struct Prober<E: Execute> {
    runner: E,
    target: String,
    count: u32,
    timeout_ms: u32,
}

impl<E: Execute> Prober<E> {
    pub fn new(runner: E, config: &AppConfig) -> Self {
        Self {
            runner,
            target: config.probe_target.clone(),
            count: config.probe_count,
            timeout_ms: config.probe_timeout_ms,
        }
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    /// Probe the configured target.
    pub async fn probe(&self) -> ConnectivityStats {
        self.probe_target(&self.target).await
    }

    /// Probe an explicit target.
    pub async fn probe_target(&self, target: &str) -> ConnectivityStats {
        let output = self
            .runner
            .run(ping_command(target, self.count, self.timeout_ms))
            .await;
        if !output.success() {
            return ConnectivityStats::unavailable();
        }
        parse_ping_report(&output.stdout)
    }
}
