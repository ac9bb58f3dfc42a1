//! Catalog Sync - reconciliation engine and orchestration
//!
//! Provides:
//! - Create-or-update reconciliation of external records into the product
//!   store, keyed by `external_id`
//! - Run orchestration with an at-most-one-run gate and per-page timeouts
//! - A snapshot-based status board read by the HTTP status endpoint
//! - An interval scheduler that triggers runs on a fixed period
//!
//! ## Modules
//!
//! - [`reconciler`] - Per-record upsert pass with failure tolerance
//! - [`orchestrator`] - Run lifecycle: gate, page loop, report persistence
//! - [`status`] - Current/last run slots with consistent snapshots
//! - [`scheduler`] - Periodic trigger with graceful shutdown

pub mod orchestrator;
pub mod reconciler;
pub mod scheduler;
pub mod status;

pub use orchestrator::{SyncOrchestrator, TriggerError};
pub use reconciler::Reconciler;
pub use scheduler::SyncScheduler;
pub use status::{StatusBoard, SyncStatus};
