//! One-shot startup sequence deciding between connected and degraded mode.
//!
//! mount check -> availability poll -> credential read -> connect -> schema.
//! Any failure up to and including connect yields `DbMode::Unavailable`;
//! a schema failure only downgrades when `require_schema` is set.

use crate::config::Config;
use crate::db::{MySqlUserStore, UserStore};
use crate::error::BackendError;
use crate::service::mode::DbMode;
use crate::service::poller::SecretPoller;
use crate::service::secrets::{self, CredentialSet, REQUIRED_SECRET_FILES};
use std::future::Future;
use std::sync::Arc;
use tracing::{info, warn};

pub const REASON_NOT_MOUNTED: &str = "Secrets not mounted";
pub const REASON_UNREADABLE: &str = "Secrets unreadable";
pub const REASON_UNREACHABLE: &str = "Database unreachable";
pub const REASON_SCHEMA: &str = "Database schema initialization failed";

/// Run the startup sequence against MySQL.
pub async fn initialize(cfg: &Config) -> DbMode {
    initialize_with(cfg, |creds| async move {
        MySqlUserStore::connect(&creds, cfg)
            .await
            .map(|store| Arc::new(store) as Arc<dyn UserStore>)
    })
    .await
}

/// Run the startup sequence with a caller-supplied connector.
pub async fn initialize_with<C, Fut>(cfg: &Config, connect: C) -> DbMode
where
    C: FnOnce(CredentialSet) -> Fut,
    Fut: Future<Output = Result<Arc<dyn UserStore>, BackendError>>,
{
    let mount = cfg.secret_path.as_path();
    if !mount.exists() {
        warn!(path = %mount.display(), "secret path not found; running without database");
        return DbMode::Unavailable {
            reason: REASON_NOT_MOUNTED.to_string(),
        };
    }

    let store = match establish(cfg, connect).await {
        Ok(store) => store,
        Err(e) => {
            warn!(error = %e, "failed to initialize database; running degraded");
            return DbMode::Unavailable {
                reason: degraded_reason(&e).to_string(),
            };
        }
    };

    let schema_ready = match store.init_schema().await {
        Ok(()) => true,
        Err(e) => {
            warn!(error = %e, "database schema initialization failed");
            false
        }
    };

    if !schema_ready && cfg.require_schema {
        warn!("schema is required; running degraded");
        return DbMode::Unavailable {
            reason: REASON_SCHEMA.to_string(),
        };
    }

    info!(schema_ready, "database available");
    DbMode::Available {
        store,
        schema_ready,
    }
}

async fn establish<C, Fut>(cfg: &Config, connect: C) -> Result<Arc<dyn UserStore>, BackendError>
where
    C: FnOnce(CredentialSet) -> Fut,
    Fut: Future<Output = Result<Arc<dyn UserStore>, BackendError>>,
{
    let mount = cfg.secret_path.as_path();
    SecretPoller::new(cfg.poll_interval(), cfg.poll_timeout())
        .wait(mount, &REQUIRED_SECRET_FILES)
        .await?;

    let creds = secrets::read_with_retry(mount, cfg.poll_interval()).await?;
    info!(target_db = %creds.display_target(cfg.db_port), "connecting to database");

    connect(creds).await
}

fn degraded_reason(e: &BackendError) -> &'static str {
    match e {
        BackendError::SecretsUnavailable { .. } => REASON_NOT_MOUNTED,
        BackendError::SecretRead { .. } | BackendError::EmptySecret { .. } => REASON_UNREADABLE,
        _ => REASON_UNREACHABLE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::User;
    use crate::service::mode::ModeKind;
    use async_trait::async_trait;
    use std::fs;
    use std::path::Path;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    struct StubStore {
        schema_ok: bool,
        schema_calls: AtomicUsize,
    }

    impl StubStore {
        fn new(schema_ok: bool) -> Arc<Self> {
            Arc::new(Self {
                schema_ok,
                schema_calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl UserStore for StubStore {
        async fn init_schema(&self) -> Result<(), BackendError> {
            self.schema_calls.fetch_add(1, Ordering::SeqCst);
            if self.schema_ok {
                Ok(())
            } else {
                Err(BackendError::SchemaInit(sqlx::Error::PoolTimedOut))
            }
        }

        async fn list_users(&self) -> Result<Vec<User>, BackendError> {
            Ok(Vec::new())
        }
    }

    fn write_secrets(dir: &Path) {
        for name in REQUIRED_SECRET_FILES {
            fs::write(dir.join(name), format!("{name}-value\n")).unwrap();
        }
    }

    fn config_for(dir: &Path) -> Config {
        Config {
            secret_path: dir.to_path_buf(),
            poll_interval_secs: 1,
            poll_timeout_secs: 3,
            ..Config::default()
        }
    }

    fn reason_of(mode: &DbMode) -> &str {
        match mode {
            DbMode::Unavailable { reason } => reason,
            DbMode::Available { .. } => panic!("expected degraded mode"),
        }
    }

    #[tokio::test]
    async fn missing_mount_is_unavailable_without_connecting() {
        let dir = TempDir::new().unwrap();
        let cfg = config_for(&dir.path().join("absent"));
        let connects = AtomicUsize::new(0);

        let mode = initialize_with(&cfg, |_creds| {
            connects.fetch_add(1, Ordering::SeqCst);
            async { Ok::<_, BackendError>(StubStore::new(true) as Arc<dyn UserStore>) }
        })
        .await;

        assert_eq!(mode.kind(), ModeKind::Unavailable);
        assert_eq!(reason_of(&mode), REASON_NOT_MOUNTED);
        assert_eq!(connects.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn poll_timeout_is_unavailable() {
        let dir = TempDir::new().unwrap();
        let cfg = config_for(dir.path());

        let mode = initialize_with(&cfg, |_creds| async {
            Ok::<_, BackendError>(StubStore::new(true) as Arc<dyn UserStore>)
        })
        .await;

        assert_eq!(reason_of(&mode), REASON_NOT_MOUNTED);
    }

    #[tokio::test(start_paused = true)]
    async fn blank_secret_is_unreadable_without_connecting() {
        let dir = TempDir::new().unwrap();
        write_secrets(dir.path());
        fs::write(dir.path().join("dbname"), " \n").unwrap();
        let cfg = config_for(dir.path());
        let connects = AtomicUsize::new(0);

        let mode = initialize_with(&cfg, |_creds| {
            connects.fetch_add(1, Ordering::SeqCst);
            async { Ok::<_, BackendError>(StubStore::new(true) as Arc<dyn UserStore>) }
        })
        .await;

        assert_eq!(reason_of(&mode), REASON_UNREADABLE);
        assert_eq!(connects.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn connect_failure_is_unavailable() {
        let dir = TempDir::new().unwrap();
        write_secrets(dir.path());
        let cfg = config_for(dir.path());

        let mode = initialize_with(&cfg, |_creds| async {
            Err::<Arc<dyn UserStore>, _>(BackendError::Connection(sqlx::Error::PoolTimedOut))
        })
        .await;

        assert_eq!(reason_of(&mode), REASON_UNREACHABLE);
    }

    #[tokio::test]
    async fn connector_receives_trimmed_credentials() {
        let dir = TempDir::new().unwrap();
        write_secrets(dir.path());
        let cfg = config_for(dir.path());

        let mode = initialize_with(&cfg, |creds| async move {
            assert_eq!(creds.host, "host-value");
            assert_eq!(creds.password, "password-value");
            Ok::<_, BackendError>(StubStore::new(true) as Arc<dyn UserStore>)
        })
        .await;

        assert!(matches!(
            mode,
            DbMode::Available {
                schema_ready: true,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn schema_failure_keeps_available_by_default() {
        let dir = TempDir::new().unwrap();
        write_secrets(dir.path());
        let cfg = config_for(dir.path());
        let store = StubStore::new(false);

        let mode = initialize_with(&cfg, {
            let store = store.clone();
            move |_creds| async move { Ok::<_, BackendError>(store as Arc<dyn UserStore>) }
        })
        .await;

        assert!(matches!(
            mode,
            DbMode::Available {
                schema_ready: false,
                ..
            }
        ));
        assert_eq!(store.schema_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn schema_failure_downgrades_when_required() {
        let dir = TempDir::new().unwrap();
        write_secrets(dir.path());
        let cfg = Config {
            require_schema: true,
            ..config_for(dir.path())
        };

        let mode = initialize_with(&cfg, |_creds| async {
            Ok::<_, BackendError>(StubStore::new(false) as Arc<dyn UserStore>)
        })
        .await;

        assert_eq!(reason_of(&mode), REASON_SCHEMA);
    }

    #[tokio::test]
    async fn unreachable_mysql_is_unavailable() {
        let dir = TempDir::new().unwrap();
        write_secrets(dir.path());
        fs::write(dir.path().join("host"), "127.0.0.1").unwrap();
        let cfg = Config {
            db_port: 1,
            connect_timeout_secs: 2,
            ..config_for(dir.path())
        };

        let mode = initialize(&cfg).await;
        assert_eq!(reason_of(&mode), REASON_UNREACHABLE);
    }
}
