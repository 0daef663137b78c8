use axum::{Json, extract::State, http::StatusCode};

use crate::router::AppState;
use crate::service::mode::ModeKind;
use crate::types::ReadyResponse;

/// Liveness: answers without touching mode state or the database.
pub async fn health_handler() -> (StatusCode, &'static str) {
    (StatusCode::OK, "OK")
}

/// Readiness: 200 only once the database is available.
pub async fn ready_handler(State(state): State<AppState>) -> (StatusCode, Json<ReadyResponse>) {
    let mode = state.mode().kind();
    let ready = mode == ModeKind::Available;
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(ReadyResponse { ready, mode }))
}
