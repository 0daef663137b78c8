use crate::error::BackendError;
use std::path::Path;
use std::time::Duration;
use tokio::time::{Instant, sleep};
use tracing::info;

/// Fixed-interval wait for secret files on a local mount.
#[derive(Debug, Clone, Copy)]
pub struct SecretPoller {
    interval: Duration,
    timeout: Duration,
}

impl SecretPoller {
    pub fn new(interval: Duration, timeout: Duration) -> Self {
        Self { interval, timeout }
    }

    /// Block until every file in `required` exists under `mount`.
    ///
    /// Returns how long the wait took. Fails with `SecretsUnavailable` once
    /// `timeout` has elapsed; the final sleep is clipped to the deadline so
    /// the failure lands between `timeout` and `timeout + interval`.
    pub async fn wait(&self, mount: &Path, required: &[&str]) -> Result<Duration, BackendError> {
        let start = Instant::now();

        loop {
            let elapsed = start.elapsed();
            if all_present(mount, required) {
                info!(
                    path = %mount.display(),
                    waited_secs = elapsed.as_secs(),
                    "all secret files found"
                );
                return Ok(elapsed);
            }

            if elapsed >= self.timeout {
                return Err(BackendError::SecretsUnavailable {
                    path: mount.to_path_buf(),
                    waited: elapsed,
                });
            }

            info!(
                path = %mount.display(),
                waited_secs = elapsed.as_secs(),
                "waiting for secrets to be mounted"
            );
            sleep(self.interval.min(self.timeout - elapsed)).await;
        }
    }
}

fn all_present(mount: &Path, required: &[&str]) -> bool {
    required.iter().all(|name| mount.join(name).exists())
}
