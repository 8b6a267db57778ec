//! Connectivity Monitor
//!
//! Polls a source's online flag on a background task and reports flips.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;

use crate::source::CapabilitySource;

/// Raised when the network flag changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectivityEvent {
    Changed { online: bool },
}

/// Handle to the polling task. The task ends on [`ConnectivityMonitor::stop`],
/// or when either this handle or the event receiver is dropped.
pub struct ConnectivityMonitor {
    stop_tx: mpsc::Sender<()>,
}

impl std::fmt::Debug for ConnectivityMonitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectivityMonitor").finish()
    }
}

impl ConnectivityMonitor {
    /// Start polling. The first reading is the baseline and is not reported.
    pub fn start(
        source: Arc<dyn CapabilitySource>,
        interval: Duration,
    ) -> (Self, mpsc::Receiver<ConnectivityEvent>) {
        let (event_tx, event_rx) = mpsc::channel(16);
        let (stop_tx, mut stop_rx) = mpsc::channel(1);

        tokio::spawn(async move {
            tracing::info!(source = source.name(), ?interval, "connectivity monitor started");
            let mut last = source.online().unwrap_or(false);
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick completes immediately.
            ticker.tick().await;

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let online = source.online().unwrap_or(false);
                        if online == last {
                            continue;
                        }
                        last = online;
                        tracing::info!(online, "connectivity changed");
                        if event_tx.send(ConnectivityEvent::Changed { online }).await.is_err() {
                            break;
                        }
                    }
                    _ = stop_rx.recv() => break,
                }
            }
            tracing::info!("connectivity monitor stopped");
        });

        (Self { stop_tx }, event_rx)
    }

    pub async fn stop(&self) -> anyhow::Result<()> {
        self.stop_tx
            .send(())
            .await
            .map_err(|_| anyhow::anyhow!("Connectivity monitor already stopped"))
    }
}
