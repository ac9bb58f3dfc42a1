//! Sync run orchestration
//!
//! The [`SyncOrchestrator`] owns the run lifecycle:
//!
//! 1. `trigger()` attempts to install a pending run in the status board's
//!    current slot. An occupied slot means a run is in flight; the caller
//!    gets its id back and nothing is queued.
//! 2. An accepted run executes on a spawned task: transition to running,
//!    then fetch pages from the provider and feed each one to the
//!    reconciler, publishing updated counts after every page.
//! 3. A provider failure (or a page exceeding the configured timeout)
//!    aborts the run as failed, keeping the counts accumulated so far.
//!    Exhausting the pages completes it as succeeded.
//! 4. The terminal run is persisted to the single-slot run store and
//!    swapped into the board's last-completed slot, freeing the gate.
//!
//! Both the interval scheduler and the HTTP trigger endpoint call the same
//! `trigger()`; neither knows nor cares who else does.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tracing::{error, info, warn};

use catalog_core::domain::newtypes::RunId;
use catalog_core::domain::sync_run::{RunError, SyncRun};
use catalog_core::ports::catalog_provider::{ICatalogProvider, PageCursor, ProviderError};
use catalog_core::ports::repositories::IRunRepository;

use crate::reconciler::Reconciler;
use crate::status::StatusBoard;

/// Rejection returned when a trigger finds a run already in flight
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TriggerError {
    /// Another run holds the gate; its id is returned to the caller
    #[error("a synchronization run is already in flight ({run_id})")]
    AlreadyRunning {
        /// Id of the in-flight run
        run_id: RunId,
    },
}

/// Coordinates reconciliation runs against the provider and the store
pub struct SyncOrchestrator {
    provider: Arc<dyn ICatalogProvider>,
    reconciler: Arc<Reconciler>,
    runs: Arc<dyn IRunRepository>,
    board: Arc<StatusBoard>,
    page_timeout: Duration,
}

impl SyncOrchestrator {
    /// Creates a new orchestrator
    ///
    /// # Arguments
    /// * `provider` - External listing source
    /// * `reconciler` - Upsert pass over the product store
    /// * `runs` - Single-slot store for completed runs
    /// * `board` - Shared status board (also read by the API)
    /// * `page_timeout` - Deadline for a single page fetch
    pub fn new(
        provider: Arc<dyn ICatalogProvider>,
        reconciler: Arc<Reconciler>,
        runs: Arc<dyn IRunRepository>,
        board: Arc<StatusBoard>,
        page_timeout: Duration,
    ) -> Self {
        Self {
            provider,
            reconciler,
            runs,
            board,
            page_timeout,
        }
    }

    /// Returns the shared status board
    pub fn board(&self) -> Arc<StatusBoard> {
        Arc::clone(&self.board)
    }

    /// Requests a new reconciliation run
    ///
    /// Returns immediately: on acceptance the run id is handed back and the
    /// run executes on a background task; on rejection the id of the
    /// in-flight run is returned. Callers that want the result poll the
    /// status board.
    pub fn trigger(&self) -> Result<RunId, TriggerError> {
        let run = SyncRun::new();
        let run_id = run.run_id();

        if let Err(in_flight) = self.board.begin(run.clone()) {
            info!(run_id = %in_flight, "Trigger rejected, run already in flight");
            return Err(TriggerError::AlreadyRunning { run_id: in_flight });
        }

        info!(run_id = %run_id, provider = self.provider.name(), "Sync run accepted");

        let ctx = RunContext {
            provider: Arc::clone(&self.provider),
            reconciler: Arc::clone(&self.reconciler),
            runs: Arc::clone(&self.runs),
            board: Arc::clone(&self.board),
            page_timeout: self.page_timeout,
        };
        tokio::spawn(async move { ctx.execute(run).await });

        Ok(run_id)
    }
}

/// Everything one run needs, detached from the orchestrator's lifetime
struct RunContext {
    provider: Arc<dyn ICatalogProvider>,
    reconciler: Arc<Reconciler>,
    runs: Arc<dyn IRunRepository>,
    board: Arc<StatusBoard>,
    page_timeout: Duration,
}

impl RunContext {
    /// Executes one run to a terminal state and publishes the result
    async fn execute(&self, mut run: SyncRun) {
        let run_id = run.run_id();

        if let Err(e) = run.start() {
            error!(run_id = %run_id, error = %e, "Run could not start");
            let _ = run.fail(RunError::provider(format!("run could not start: {e}")));
            self.complete(run).await;
            return;
        }
        self.board.publish(run.clone());

        let mut cursor: Option<PageCursor> = None;
        let mut pages: u32 = 0;

        loop {
            let offset = cursor.as_ref().map(PageCursor::offset).unwrap_or(0);

            let page = match tokio::time::timeout(
                self.page_timeout,
                self.provider.fetch_page(cursor.as_ref()),
            )
            .await
            {
                Ok(Ok(page)) => page,
                Ok(Err(err)) => {
                    warn!(run_id = %run_id, error = %err, "Provider page failed, aborting run");
                    if let Err(e) = run.fail(RunError::provider(err.to_string())) {
                        error!(run_id = %run_id, error = %e, "Run refused failure transition");
                    }
                    break;
                }
                Err(_) => {
                    let err = ProviderError::Timeout {
                        offset,
                        timeout_secs: self.page_timeout.as_secs(),
                    };
                    warn!(run_id = %run_id, error = %err, "Provider page timed out, aborting run");
                    if let Err(e) = run.fail(RunError::provider(err.to_string())) {
                        error!(run_id = %run_id, error = %e, "Run refused failure transition");
                    }
                    break;
                }
            };

            pages += 1;
            let report = self.reconciler.reconcile_page(&page.records).await;
            run.absorb(&report);
            self.board.publish(run.clone());

            match page.next_cursor {
                Some(next) => cursor = Some(next),
                None => {
                    if let Err(e) = run.succeed() {
                        error!(run_id = %run_id, error = %e, "Run refused success transition");
                    }
                    break;
                }
            }
        }

        info!(
            run_id = %run_id,
            status = %run.status(),
            pages,
            fetched = run.records_fetched(),
            created = run.records_created(),
            updated = run.records_updated(),
            failed = run.records_failed(),
            "Sync run finished"
        );

        self.complete(run).await;
    }

    /// Persists the terminal run and frees the gate
    ///
    /// Persistence failure is logged but does not keep the gate held; the
    /// in-memory board still carries the result.
    async fn complete(&self, run: SyncRun) {
        if let Err(e) = self.runs.save_last(&run).await {
            error!(run_id = %run.run_id(), error = %format!("{e:#}"), "Failed to persist run report");
        }
        self.board.finish(run);
    }
}
