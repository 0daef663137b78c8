//! Database availability recorded once at startup.
//!
//! `ModeState` starts uninitialized and accepts exactly one transition to
//! either `Available` or `Unavailable`. Handlers read it, never write it.

use crate::db::UserStore;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::{Arc, OnceLock};

/// Outcome of the startup sequence.
#[derive(Clone)]
pub enum DbMode {
    Available {
        store: Arc<dyn UserStore>,
        /// False when the baseline schema step failed but the connection held.
        schema_ready: bool,
    },
    Unavailable {
        reason: String,
    },
}

impl DbMode {
    pub fn kind(&self) -> ModeKind {
        match self {
            DbMode::Available { .. } => ModeKind::Available,
            DbMode::Unavailable { .. } => ModeKind::Unavailable,
        }
    }

    pub fn store(&self) -> Option<&Arc<dyn UserStore>> {
        match self {
            DbMode::Available { store, .. } => Some(store),
            DbMode::Unavailable { .. } => None,
        }
    }
}

impl fmt::Debug for DbMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DbMode::Available { schema_ready, .. } => f
                .debug_struct("Available")
                .field("schema_ready", schema_ready)
                .finish_non_exhaustive(),
            DbMode::Unavailable { reason } => f
                .debug_struct("Unavailable")
                .field("reason", reason)
                .finish(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModeKind {
    Uninitialized,
    Available,
    Unavailable,
}

impl fmt::Display for ModeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ModeKind::Uninitialized => "uninitialized",
            ModeKind::Available => "available",
            ModeKind::Unavailable => "unavailable",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Default)]
pub struct ModeState {
    mode: OnceLock<DbMode>,
}

impl ModeState {
    pub fn new() -> Self {
        Self::default()
    }

    /// A state that has already completed its transition.
    pub fn resolved(mode: DbMode) -> Self {
        let state = Self::new();
        let _ = state.mode.set(mode);
        state
    }

    /// Record the startup outcome. Returns the rejected mode if one was
    /// already recorded.
    pub fn resolve(&self, mode: DbMode) -> Result<(), DbMode> {
        self.mode.set(mode)
    }

    pub fn get(&self) -> Option<&DbMode> {
        self.mode.get()
    }

    pub fn kind(&self) -> ModeKind {
        self.get()
            .map(DbMode::kind)
            .unwrap_or(ModeKind::Uninitialized)
    }
}
