pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod router;
pub mod service;
pub mod types;

pub use config::Config;
pub use error::BackendError;
pub use router::{AppState, app_router};
pub use service::mode::{DbMode, ModeKind, ModeState};
