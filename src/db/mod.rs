//! Database module: row models, schema and the MySQL-backed user store.
//!
//! Layout:
//! - `models.rs`: Rust structs mirroring DB rows
//! - `schema.rs`: SQL DDL for the baseline schema
//! - `mysql.rs`: pool construction and the `UserStore` implementation

pub mod models;
pub mod mysql;
pub mod schema;

pub use models::User;
pub use mysql::{MySqlPool, MySqlUserStore};
pub use schema::USERS_TABLE;

use crate::error::BackendError;
use async_trait::async_trait;

/// Storage seam used by request handlers and the startup sequence.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Provision the baseline schema. Must be idempotent.
    async fn init_schema(&self) -> Result<(), BackendError>;

    async fn list_users(&self) -> Result<Vec<User>, BackendError>;
}
