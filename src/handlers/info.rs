use axum::{Json, extract::State};

use crate::router::AppState;
use crate::service::mode::{DbMode, ModeKind};
use crate::types::status::{STATUS_CONNECTED, STATUS_DEGRADED};
use crate::types::{InfoResponse, KnownEndpoints};

/// Report the database mode. Always 200; degradation is signalled in the body.
pub async fn info_handler(State(state): State<AppState>) -> Json<InfoResponse> {
    let resp = match state.mode().get() {
        Some(DbMode::Available { schema_ready, .. }) => InfoResponse {
            status: STATUS_CONNECTED.to_string(),
            mode: ModeKind::Available,
            schema_ready: Some(*schema_ready),
            degraded: None,
            message: None,
            endpoints: None,
        },
        Some(DbMode::Unavailable { reason }) => degraded(ModeKind::Unavailable, reason),
        None => degraded(ModeKind::Uninitialized, "Startup in progress"),
    };
    Json(resp)
}

fn degraded(mode: ModeKind, message: &str) -> InfoResponse {
    InfoResponse {
        status: STATUS_DEGRADED.to_string(),
        mode,
        schema_ready: None,
        degraded: Some(true),
        message: Some(message.to_string()),
        endpoints: Some(KnownEndpoints::default()),
    }
}
