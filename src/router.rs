use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

use crate::handlers::{health, index, info, users};
use crate::service::mode::{DbMode, ModeState};

/// Shared state injected into every handler.
#[derive(Clone)]
pub struct AppState {
    mode: Arc<ModeState>,
}

impl AppState {
    pub fn new(mode: Arc<ModeState>) -> Self {
        Self { mode }
    }

    /// State whose startup sequence has already finished.
    pub fn with_mode(mode: DbMode) -> Self {
        Self::new(Arc::new(ModeState::resolved(mode)))
    }

    pub fn mode(&self) -> &ModeState {
        &self.mode
    }
}

pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/ready", get(health::ready_handler))
        .route("/", get(index::index_handler))
        .route("/api/info", get(info::info_handler))
        .route("/api/status", get(info::info_handler))
        .route("/users", get(users::list_users_handler))
        .route("/init-db", post(users::init_db_handler))
        .with_state(state)
}
