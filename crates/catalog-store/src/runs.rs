//! SQLite implementation of IRunRepository
//!
//! The `sync_runs` table holds at most one row: the last completed
//! reconciliation run. `save_last` clears the table before inserting, so
//! "history" is a single slot and never grows.

use std::str::FromStr;

use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use catalog_core::domain::newtypes::RunId;
use catalog_core::domain::sync_run::{RunError, RunStatus, SyncRun};
use catalog_core::ports::repositories::IRunRepository;

use crate::util::{parse_datetime, parse_optional_datetime};
use crate::StoreError;

/// SQLite-based implementation of the single-slot run repository
pub struct SqliteRunRepository {
    pool: SqlitePool,
}

impl SqliteRunRepository {
    /// Creates a new repository instance with the given connection pool
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

/// Reconstruct a SyncRun from a database row
fn run_from_row(row: &SqliteRow) -> Result<SyncRun, StoreError> {
    let run_id_str: String = row.get("run_id");
    let started_at_str: String = row.get("started_at");
    let finished_at_str: Option<String> = row.get("finished_at");
    let status_str: String = row.get("status");
    let records_fetched: i64 = row.get("records_fetched");
    let records_created: i64 = row.get("records_created");
    let records_updated: i64 = row.get("records_updated");
    let records_failed: i64 = row.get("records_failed");
    let errors_str: String = row.get("errors");

    let run_id = RunId::from_str(&run_id_str).map_err(|e| {
        StoreError::SerializationError(format!("Invalid RunId '{}': {}", run_id_str, e))
    })?;

    let started_at = parse_datetime(&started_at_str)?;
    let finished_at = parse_optional_datetime(finished_at_str)?;

    let status = RunStatus::from_str(&status_str).map_err(|e| {
        StoreError::SerializationError(format!("Invalid run status '{}': {}", status_str, e))
    })?;

    let errors: Vec<RunError> = serde_json::from_str(&errors_str).map_err(|e| {
        StoreError::SerializationError(format!("Invalid run errors JSON: {}", e))
    })?;

    Ok(SyncRun::from_parts(
        run_id,
        started_at,
        finished_at,
        status,
        records_fetched as u64,
        records_created as u64,
        records_updated as u64,
        records_failed as u64,
        errors,
    ))
}

#[async_trait::async_trait]
impl IRunRepository for SqliteRunRepository {
    async fn save_last(&self, run: &SyncRun) -> anyhow::Result<()> {
        let run_id = run.run_id().to_string();
        let started_at = run.started_at().to_rfc3339();
        let finished_at = run.finished_at().map(|dt| dt.to_rfc3339());
        let status = run.status().to_string();
        let errors = serde_json::to_string(run.errors())
            .map_err(|e| anyhow::anyhow!("Failed to serialize run errors: {}", e))?;

        // Single slot: drop whatever was there before.
        sqlx::query("DELETE FROM sync_runs")
            .execute(&self.pool)
            .await?;

        sqlx::query(
            "INSERT INTO sync_runs \
             (run_id, started_at, finished_at, status, \
              records_fetched, records_created, records_updated, records_failed, errors) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&run_id)
        .bind(&started_at)
        .bind(&finished_at)
        .bind(&status)
        .bind(run.records_fetched() as i64)
        .bind(run.records_created() as i64)
        .bind(run.records_updated() as i64)
        .bind(run.records_failed() as i64)
        .bind(&errors)
        .execute(&self.pool)
        .await?;

        tracing::trace!(run_id = %run_id, status = %status, "Saved last sync run");
        Ok(())
    }

    async fn load_last(&self) -> anyhow::Result<Option<SyncRun>> {
        let row = sqlx::query("SELECT * FROM sync_runs ORDER BY started_at DESC LIMIT 1")
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(ref r) => Ok(Some(run_from_row(r)?)),
            None => Ok(None),
        }
    }
}
