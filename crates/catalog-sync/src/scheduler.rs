//! Interval scheduler for reconciliation runs
//!
//! The [`SyncScheduler`] drives the orchestrator on a fixed period. It goes
//! through the exact same [`SyncOrchestrator::trigger`] entry point as the
//! HTTP endpoint, so the at-most-one-run gate arbitrates between the two:
//! a tick that lands while a manually triggered run is in flight is simply
//! skipped.
//!
//! The first tick fires immediately, giving a freshly started service an
//! initial reconciliation pass before the first full interval elapses.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::orchestrator::{SyncOrchestrator, TriggerError};

/// Triggers reconciliation runs on a fixed interval
pub struct SyncScheduler {
    orchestrator: Arc<SyncOrchestrator>,
    interval: Duration,
}

impl SyncScheduler {
    /// Creates a new scheduler
    ///
    /// # Arguments
    /// * `orchestrator` - Shared orchestrator, also used by the API
    /// * `interval` - Time between scheduled runs
    pub fn new(orchestrator: Arc<SyncOrchestrator>, interval: Duration) -> Self {
        Self {
            orchestrator,
            interval,
        }
    }

    /// Main scheduler loop
    ///
    /// Runs until the cancellation token fires. Ticks that cannot acquire
    /// the run gate are logged and skipped; no backlog of missed runs is
    /// accumulated.
    pub async fn run(&self, shutdown: CancellationToken) {
        info!(
            interval_secs = self.interval.as_secs(),
            "Sync scheduler starting"
        );

        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    match self.orchestrator.trigger() {
                        Ok(run_id) => {
                            info!(run_id = %run_id, "Scheduled sync run started");
                        }
                        Err(TriggerError::AlreadyRunning { run_id }) => {
                            warn!(
                                run_id = %run_id,
                                "Skipping scheduled tick, run already in flight"
                            );
                        }
                    }
                }
                _ = shutdown.cancelled() => {
                    info!("Sync scheduler shutting down");
                    break;
                }
            }
        }

        info!("Sync scheduler stopped");
    }
}
