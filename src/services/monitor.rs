// NetCommand - Status Monitor
// SPDX-License-Identifier: MIT

//! Periodic status aggregation.
//!
//! On each tick the monitor probes connectivity and geolocates the public
//! IP concurrently, then publishes one [`StatusSnapshot`] over a channel to
//! the single owner of display state. Snapshots are whole-cycle values:
//! a tick with no geolocation data publishes `None` rather than carrying
//! the previous tick's identity forward.

use std::time::Duration;

use tokio::sync::mpsc;
use tracing::debug;

use crate::command::Execute;
use crate::models::StatusSnapshot;
use crate::services::lookup::LookupClient;
use crate::services::probe::Prober;

/// Periodic status aggregator.
pub struct StatusMonitor<E: Execute> {
    prober: Prober<E>,
    lookup: LookupClient,
    interval: Duration,
    tx: mpsc::Sender<StatusSnapshot>,
}

impl<E: Execute> StatusMonitor<E> {
    pub fn new(
        prober: Prober<E>,
        lookup: LookupClient,
        interval: Duration,
        tx: mpsc::Sender<StatusSnapshot>,
    ) -> Self {
        Self {
            prober,
            lookup,
            interval,
            tx,
        }
    }

    /// Take one snapshot: probe and locate concurrently, merge when both
    /// complete.
    pub async fn collect(&self) -> StatusSnapshot {
        let (connectivity, location) = tokio::join!(self.prober.probe(), self.lookup.locate());
        StatusSnapshot::new(connectivity, location)
    }

    /// Publish snapshots on the configured interval until the receiver is
    /// dropped. The first tick fires immediately.
    pub async fn run(self) {
        let mut ticker = tokio::time::interval(self.interval);
        loop {
            ticker.tick().await;
            let snapshot = self.collect().await;
            if self.tx.send(snapshot).await.is_err() {
                debug!("Status receiver dropped, monitor stopping");
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::mock::ScriptedRunner;
    use crate::command::CommandOutput;
    use crate::models::AppConfig;

    #[tokio::test]
    async fn collect_merges_probe_into_snapshot() {
        let config = AppConfig::default();
        let prober = Prober::new(
            ScriptedRunner::with(|_| {
                CommandOutput::exited(
                    0,
                    "Packets: Sent = 2, Received = 2, Lost = 0 (0% loss),\nAverage = 18ms",
                    "",
                )
            }),
            &config,
        );
        // No network in tests: the lookup side will time out or fail and
        // must surface as a location-less snapshot, not an error.
        let lookup = LookupClient::new(&config).unwrap();
        let monitor = StatusMonitor::new(
            prober,
            lookup,
            Duration::from_secs(15),
            mpsc::channel(1).0,
        );

        let snapshot = monitor.collect().await;
        assert_eq!(snapshot.connectivity.latency_ms, Some(18));
        assert_eq!(snapshot.connectivity.loss_percent, Some(0));
    }
}
