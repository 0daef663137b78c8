use axum::{Json, extract::State};
use std::sync::Arc;
use tracing::{info, warn};

use crate::db::UserStore;
use crate::error::BackendError;
use crate::router::AppState;
use crate::types::{InitDbResponse, UsersResponse};

/// Resolve the store for this request, failing fast when the database is
/// not available. No connection is attempted in that case.
fn require_store(state: &AppState) -> Result<Arc<dyn UserStore>, BackendError> {
    state
        .mode()
        .get()
        .and_then(|mode| mode.store())
        .cloned()
        .ok_or(BackendError::DatabaseUnavailable)
}

pub async fn list_users_handler(
    State(state): State<AppState>,
) -> Result<Json<UsersResponse>, BackendError> {
    let store = require_store(&state)?;
    let users = store.list_users().await.inspect_err(|e| {
        warn!(error = %e, "listing users failed");
    })?;
    Ok(Json(UsersResponse { users }))
}

/// Re-run the idempotent schema step. Does not change the recorded mode.
pub async fn init_db_handler(
    State(state): State<AppState>,
) -> Result<Json<InitDbResponse>, BackendError> {
    let store = require_store(&state)?;
    store.init_schema().await.inspect_err(|e| {
        warn!(error = %e, "on-demand schema initialization failed");
    })?;
    info!("schema initialized on demand");
    Ok(Json(InitDbResponse {
        status: "ok".to_string(),
    }))
}
