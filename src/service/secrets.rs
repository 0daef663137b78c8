use crate::error::BackendError;
use backon::{ConstantBuilder, Retryable};
use std::{fmt, fs, path::Path, time::Duration};
use tracing::warn;

pub const HOST_FILE: &str = "host";
pub const USERNAME_FILE: &str = "username";
pub const PASSWORD_FILE: &str = "password";
pub const DBNAME_FILE: &str = "dbname";

/// Files the secret store must mount before a connection is attempted.
pub const REQUIRED_SECRET_FILES: [&str; 4] = [HOST_FILE, USERNAME_FILE, PASSWORD_FILE, DBNAME_FILE];

/// Database credentials read from the secret mount. Immutable once read.
#[derive(Clone, PartialEq, Eq)]
pub struct CredentialSet {
    pub host: String,
    pub username: String,
    pub password: String,
    pub dbname: String,
}

impl fmt::Debug for CredentialSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialSet")
            .field("host", &self.host)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("dbname", &self.dbname)
            .finish()
    }
}

impl CredentialSet {
    /// Read all four credential files from `mount`, trimming surrounding whitespace.
    pub fn read_from(mount: &Path) -> Result<Self, BackendError> {
        Ok(Self {
            host: read_secret(mount, HOST_FILE)?,
            username: read_secret(mount, USERNAME_FILE)?,
            password: read_secret(mount, PASSWORD_FILE)?,
            dbname: read_secret(mount, DBNAME_FILE)?,
        })
    }

    /// `user@host:port/db`, safe for logs.
    pub fn display_target(&self, port: u16) -> String {
        format!("{}@{}:{}/{}", self.username, self.host, port, self.dbname)
    }
}

fn read_secret(mount: &Path, name: &str) -> Result<String, BackendError> {
    let path = mount.join(name);
    let contents = fs::read_to_string(&path).map_err(|source| BackendError::SecretRead {
        path: path.clone(),
        source,
    })?;
    let value = contents.trim();
    if value.is_empty() {
        return Err(BackendError::EmptySecret { path });
    }
    Ok(value.to_string())
}

/// Read credentials, retrying once after `delay` if the mount was caught
/// mid-update between the availability poll and the read.
pub async fn read_with_retry(mount: &Path, delay: Duration) -> Result<CredentialSet, BackendError> {
    let retry_policy = ConstantBuilder::default()
        .with_delay(delay)
        .with_max_times(1);

    (|| async { CredentialSet::read_from(mount) })
        .retry(retry_policy)
        .when(|e: &BackendError| e.is_retryable())
        .notify(|err, dur: Duration| {
            warn!(
                path = %mount.display(),
                error = %err,
                "secret read failed, retrying after {:?}",
                dur
            );
        })
        .await
}
