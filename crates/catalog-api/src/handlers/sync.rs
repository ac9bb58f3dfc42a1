//! Reconciliation control endpoints (admin only)
//!
//! Both endpoints respond immediately regardless of what the job is doing:
//! the trigger installs a run or reports the in-flight one, and the status
//! read is a lock-free snapshot copy.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use catalog_sync::TriggerError;

use crate::auth::AdminUser;
use crate::error::ApiError;
use crate::models::{StatusResponse, TriggerResponse};
use crate::state::AppState;

/// `POST /sync/trigger` - request a reconciliation run
///
/// Returns `202 Accepted` with the new run id, or `409 Conflict` with the
/// id of the run already in flight. Nothing is queued on conflict; callers
/// retry after polling the status endpoint.
pub async fn trigger_sync(
    State(state): State<AppState>,
    AdminUser(claims): AdminUser,
) -> Result<(StatusCode, Json<TriggerResponse>), ApiError> {
    match state.orchestrator.trigger() {
        Ok(run_id) => {
            tracing::info!(run_id = %run_id, admin = %claims.email, "Manual sync triggered");
            Ok((StatusCode::ACCEPTED, Json(TriggerResponse { run_id })))
        }
        Err(TriggerError::AlreadyRunning { run_id }) => {
            Ok((StatusCode::CONFLICT, Json(TriggerResponse { run_id })))
        }
    }
}

/// `GET /sync/status` - current and last-completed run
pub async fn sync_status(
    State(state): State<AppState>,
    AdminUser(_claims): AdminUser,
) -> Result<Json<StatusResponse>, ApiError> {
    let snapshot = state.board.snapshot();
    Ok(Json(StatusResponse::from(&snapshot)))
}
