use crate::config::Config;
use crate::db::UserStore;
use crate::db::models::User;
use crate::db::schema::USERS_TABLE;
use crate::error::BackendError;
use crate::service::secrets::CredentialSet;
use async_trait::async_trait;
use sqlx::mysql::{MySqlConnectOptions, MySqlPoolOptions};
use sqlx::{MySql, Pool};
use tracing::{debug, info};

pub type MySqlPool = Pool<MySql>;

#[derive(Clone)]
pub struct MySqlUserStore {
    pool: MySqlPool,
}

impl MySqlUserStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Open a bounded pool for the given credentials.
    ///
    /// `connect_with` establishes one connection before returning, so an
    /// unreachable server or rejected login fails here rather than on the
    /// first request.
    pub async fn connect(creds: &CredentialSet, cfg: &Config) -> Result<Self, BackendError> {
        let opts = connect_options(creds, cfg.db_port);
        let pool = MySqlPoolOptions::new()
            .max_connections(cfg.max_connections)
            .acquire_timeout(cfg.connect_timeout())
            .connect_with(opts)
            .await
            .map_err(BackendError::Connection)?;
        info!(
            target_db = %creds.display_target(cfg.db_port),
            max_connections = cfg.max_connections,
            "database pool established"
        );
        Ok(Self::new(pool))
    }
}

pub fn connect_options(creds: &CredentialSet, port: u16) -> MySqlConnectOptions {
    MySqlConnectOptions::new()
        .host(&creds.host)
        .port(port)
        .username(&creds.username)
        .password(&creds.password)
        .database(&creds.dbname)
}

#[async_trait]
impl UserStore for MySqlUserStore {
    async fn init_schema(&self) -> Result<(), BackendError> {
        // DDL auto-commits in MySQL; the explicit transaction keeps the
        // connection lease scoped to this call on every exit path.
        let mut tx = self.pool.begin().await.map_err(BackendError::SchemaInit)?;
        sqlx::query(USERS_TABLE)
            .execute(&mut *tx)
            .await
            .map_err(BackendError::SchemaInit)?;
        tx.commit().await.map_err(BackendError::SchemaInit)?;
        debug!("users table ensured");
        Ok(())
    }

    async fn list_users(&self) -> Result<Vec<User>, BackendError> {
        let rows = sqlx::query_as::<_, User>(
            r#"SELECT id, name, email, created_at FROM users ORDER BY id"#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
