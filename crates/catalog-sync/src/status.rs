//! Run status board
//!
//! The [`StatusBoard`] holds the current and last-completed [`SyncRun`]
//! behind one lock. The orchestrator is the only writer and swaps whole
//! `Arc<SyncRun>` values; readers clone the two `Arc`s out and never see a
//! partially written run. The same lock doubles as the at-most-one-run
//! gate: [`StatusBoard::begin`] installs a run only when the current slot
//! is free, atomically with the occupancy check.

use std::sync::{Arc, RwLock};

use catalog_core::domain::newtypes::RunId;
use catalog_core::domain::sync_run::SyncRun;

/// Consistent snapshot of the board's two slots
///
/// `current` is the in-flight run (None when idle); `last_completed` is the
/// most recent terminal run. Both are immutable shared copies, so holding a
/// snapshot never blocks the orchestrator.
#[derive(Debug, Clone, Default)]
pub struct SyncStatus {
    /// The in-flight run, if any
    pub current: Option<Arc<SyncRun>>,
    /// The most recent completed run, if any
    pub last_completed: Option<Arc<SyncRun>>,
}

#[derive(Debug, Default)]
struct Slots {
    current: Option<Arc<SyncRun>>,
    last_completed: Option<Arc<SyncRun>>,
}

/// Single-writer, multiple-reader store for run state
#[derive(Debug, Default)]
pub struct StatusBoard {
    inner: RwLock<Slots>,
}

impl StatusBoard {
    /// Creates an empty board
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a board seeded with a stored last-completed run
    ///
    /// Used at startup so the status endpoint reflects the previous
    /// process's final run.
    pub fn with_last_completed(run: Option<SyncRun>) -> Self {
        Self {
            inner: RwLock::new(Slots {
                current: None,
                last_completed: run.map(Arc::new),
            }),
        }
    }

    /// Installs `run` as the current run if the slot is free
    ///
    /// This is the mutual-exclusion gate: occupancy check and installation
    /// happen under one write lock, so two concurrent triggers cannot both
    /// succeed.
    ///
    /// # Errors
    ///
    /// Returns the id of the in-flight run when the slot is occupied.
    pub fn begin(&self, run: SyncRun) -> Result<(), RunId> {
        let mut slots = self.write();
        if let Some(ref current) = slots.current {
            return Err(current.run_id());
        }
        slots.current = Some(Arc::new(run));
        Ok(())
    }

    /// Replaces the current run with an updated copy
    ///
    /// Called by the orchestrator after each processed page so status
    /// readers see counts accumulate.
    pub fn publish(&self, run: SyncRun) {
        let mut slots = self.write();
        slots.current = Some(Arc::new(run));
    }

    /// Moves a finished run into the last-completed slot and frees the gate
    pub fn finish(&self, run: SyncRun) {
        let mut slots = self.write();
        slots.current = None;
        slots.last_completed = Some(Arc::new(run));
    }

    /// Returns a consistent snapshot of both slots
    pub fn snapshot(&self) -> SyncStatus {
        let slots = self.read();
        SyncStatus {
            current: slots.current.clone(),
            last_completed: slots.last_completed.clone(),
        }
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Slots> {
        self.inner.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Slots> {
        self.inner.write().unwrap_or_else(|e| e.into_inner())
    }
}
