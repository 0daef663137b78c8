use crate::db::User;
use crate::service::mode::ModeKind;
use serde::{Deserialize, Serialize};

pub const STATUS_CONNECTED: &str = "Connected to RDS";
pub const STATUS_DEGRADED: &str = "Running without database";

/// Endpoints that keep working without a database.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct KnownEndpoints {
    pub health: String,
    pub map: String,
}

impl Default for KnownEndpoints {
    fn default() -> Self {
        Self {
            health: "/health".to_string(),
            map: "/".to_string(),
        }
    }
}

/// Payload for `/api/info` and `/api/status`. Always served with 200.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InfoResponse {
    pub status: String,
    pub mode: ModeKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema_ready: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub degraded: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoints: Option<KnownEndpoints>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReadyResponse {
    pub ready: bool,
    pub mode: ModeKind,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UsersResponse {
    pub users: Vec<User>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InitDbResponse {
    pub status: String,
}
