//! SyncRun domain entity
//!
//! A [`SyncRun`] tracks one execution of the reconciliation job.
//!
//! ## State Machine
//!
//! ```text
//!     ┌─────────┐   start    ┌─────────┐   pages exhausted   ┌───────────┐
//!     │ Pending │ ─────────► │ Running │ ──────────────────► │ Succeeded │
//!     └─────────┘            └─────────┘                     └───────────┘
//!                                 │
//!                                 │ provider failure / timeout
//!                                 ▼
//!                            ┌─────────┐
//!                            │ Failed  │
//!                            └─────────┘
//! ```
//!
//! At most one run is `Running` at a time; that invariant is enforced by the
//! orchestration layer, not the entity. Counters accumulate one
//! [`ReconcileReport`] per processed page, and the entity guarantees that
//! `created + updated + failed == fetched` holds whenever reports are the
//! only source of counter mutation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::errors::DomainError;
use super::newtypes::{ExternalId, RunId};

/// Lifecycle state of a reconciliation run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    /// Accepted but not yet executing
    #[default]
    Pending,
    /// Currently fetching and reconciling pages
    Running,
    /// All pages processed (individual records may still have failed)
    Succeeded,
    /// Aborted by a provider-level failure
    Failed,
}

impl RunStatus {
    /// Returns the state name as a string
    pub fn name(&self) -> &'static str {
        match self {
            RunStatus::Pending => "Pending",
            RunStatus::Running => "Running",
            RunStatus::Succeeded => "Succeeded",
            RunStatus::Failed => "Failed",
        }
    }

    /// Returns true once the run can no longer change
    pub fn is_terminal(&self) -> bool {
        matches!(self, RunStatus::Succeeded | RunStatus::Failed)
    }
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunStatus::Pending => write!(f, "pending"),
            RunStatus::Running => write!(f, "running"),
            RunStatus::Succeeded => write!(f, "succeeded"),
            RunStatus::Failed => write!(f, "failed"),
        }
    }
}

impl std::str::FromStr for RunStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(RunStatus::Pending),
            "running" => Ok(RunStatus::Running),
            "succeeded" => Ok(RunStatus::Succeeded),
            "failed" => Ok(RunStatus::Failed),
            other => Err(DomainError::ValidationFailed(format!(
                "Unknown run status: {other}"
            ))),
        }
    }
}

/// One recorded failure within a run
///
/// Record-level failures carry the external id of the offending record;
/// provider-level failures (page fetch, decode, timeout) carry `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunError {
    /// External id of the failing record, absent for provider-level errors
    pub external_id: Option<ExternalId>,
    /// Human-readable failure reason
    pub reason: String,
}

impl RunError {
    /// Creates a record-level error entry
    pub fn record(external_id: ExternalId, reason: impl Into<String>) -> Self {
        Self {
            external_id: Some(external_id),
            reason: reason.into(),
        }
    }

    /// Creates a provider-level error entry
    pub fn provider(reason: impl Into<String>) -> Self {
        Self {
            external_id: None,
            reason: reason.into(),
        }
    }
}

/// Outcome tally for one reconciled batch (typically one provider page)
///
/// Every record that enters reconciliation lands in exactly one of the
/// `created`/`updated`/`failed` buckets, so `is_balanced` holds for any
/// report produced by the reconciler.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReconcileReport {
    /// Records that entered reconciliation
    pub fetched: u64,
    /// Records inserted as new products
    pub created: u64,
    /// Records matched to an existing product (changed or identical)
    pub updated: u64,
    /// Records whose write failed
    pub failed: u64,
    /// One entry per failed record, in provider order
    pub errors: Vec<RunError>,
}

impl ReconcileReport {
    /// Returns true when every fetched record is accounted for
    pub fn is_balanced(&self) -> bool {
        self.created + self.updated + self.failed == self.fetched
    }
}

/// One execution of the reconciliation job
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncRun {
    /// Run identifier returned to trigger callers
    run_id: RunId,
    /// When the trigger was accepted
    started_at: DateTime<Utc>,
    /// When the run reached a terminal state (None while in flight)
    finished_at: Option<DateTime<Utc>>,
    /// Current lifecycle state
    status: RunStatus,
    /// Records fetched across all processed pages
    records_fetched: u64,
    /// Records inserted as new products
    records_created: u64,
    /// Records matched to existing products
    records_updated: u64,
    /// Records whose write failed
    records_failed: u64,
    /// Record-level and provider-level failures, in occurrence order
    errors: Vec<RunError>,
}

impl SyncRun {
    /// Creates a new run in `Pending` state with a fresh id
    pub fn new() -> Self {
        Self {
            run_id: RunId::new(),
            started_at: Utc::now(),
            finished_at: None,
            status: RunStatus::Pending,
            records_fetched: 0,
            records_created: 0,
            records_updated: 0,
            records_failed: 0,
            errors: Vec::new(),
        }
    }

    /// Reconstructs a run from stored parts (repository row mapping)
    #[allow(clippy::too_many_arguments)]
    pub fn from_parts(
        run_id: RunId,
        started_at: DateTime<Utc>,
        finished_at: Option<DateTime<Utc>>,
        status: RunStatus,
        records_fetched: u64,
        records_created: u64,
        records_updated: u64,
        records_failed: u64,
        errors: Vec<RunError>,
    ) -> Self {
        Self {
            run_id,
            started_at,
            finished_at,
            status,
            records_fetched,
            records_created,
            records_updated,
            records_failed,
            errors,
        }
    }

    // --- Getters ---

    /// Returns the run identifier
    pub fn run_id(&self) -> RunId {
        self.run_id
    }

    /// Returns when the trigger was accepted
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Returns when the run finished, if it has
    pub fn finished_at(&self) -> Option<DateTime<Utc>> {
        self.finished_at
    }

    /// Returns the current status
    pub fn status(&self) -> RunStatus {
        self.status
    }

    /// Returns the fetched-record count
    pub fn records_fetched(&self) -> u64 {
        self.records_fetched
    }

    /// Returns the created-record count
    pub fn records_created(&self) -> u64 {
        self.records_created
    }

    /// Returns the updated-record count
    pub fn records_updated(&self) -> u64 {
        self.records_updated
    }

    /// Returns the failed-record count
    pub fn records_failed(&self) -> u64 {
        self.records_failed
    }

    /// Returns the recorded failures
    pub fn errors(&self) -> &[RunError] {
        &self.errors
    }

    /// Returns true when every fetched record is accounted for
    pub fn is_balanced(&self) -> bool {
        self.records_created + self.records_updated + self.records_failed == self.records_fetched
    }

    // --- Transitions ---

    /// Transitions `Pending -> Running`
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidState` if the run is not pending.
    pub fn start(&mut self) -> Result<(), DomainError> {
        if self.status != RunStatus::Pending {
            return Err(self.invalid_transition(RunStatus::Running));
        }
        self.status = RunStatus::Running;
        Ok(())
    }

    /// Folds a batch report into the run's counters and error list
    pub fn absorb(&mut self, report: &ReconcileReport) {
        self.records_fetched += report.fetched;
        self.records_created += report.created;
        self.records_updated += report.updated;
        self.records_failed += report.failed;
        self.errors.extend(report.errors.iter().cloned());
    }

    /// Transitions `Running -> Succeeded` and stamps `finished_at`
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidState` if the run is not running.
    pub fn succeed(&mut self) -> Result<(), DomainError> {
        if self.status != RunStatus::Running {
            return Err(self.invalid_transition(RunStatus::Succeeded));
        }
        self.status = RunStatus::Succeeded;
        self.finished_at = Some(Utc::now());
        Ok(())
    }

    /// Transitions to `Failed`, recording the aborting error
    ///
    /// Partial counters accumulated before the failure are kept. Allowed
    /// from `Pending` as well so a run that never managed to start still
    /// reaches a terminal state.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidState` if the run already finished.
    pub fn fail(&mut self, error: RunError) -> Result<(), DomainError> {
        if self.status.is_terminal() {
            return Err(self.invalid_transition(RunStatus::Failed));
        }
        self.errors.push(error);
        self.status = RunStatus::Failed;
        self.finished_at = Some(Utc::now());
        Ok(())
    }

    fn invalid_transition(&self, to: RunStatus) -> DomainError {
        DomainError::InvalidState {
            from: self.status.name().to_string(),
            to: to.name().to_string(),
        }
    }
}

impl Default for SyncRun {
    fn default() -> Self {
        Self::new()
    }
}
