//! Runtime configuration.
//!
//! Layered with figment: built-in defaults, then an optional `config.toml`
//! in the working directory, then `RDS_*` environment variables.

use crate::error::BackendError;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

pub const ENV_PREFIX: &str = "RDS_";
pub const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Directory where the secret store mounts `host`, `username`, `password`, `dbname`.
    pub secret_path: PathBuf,
    pub db_port: u16,
    pub listen_addr: String,
    pub poll_interval_secs: u64,
    pub poll_timeout_secs: u64,
    pub connect_timeout_secs: u64,
    pub max_connections: u32,
    /// Treat a failed schema step as a failed startup.
    pub require_schema: bool,
    pub loglevel: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            secret_path: PathBuf::from("/mnt/rds-secret"),
            db_port: 3306,
            listen_addr: "0.0.0.0:8080".to_string(),
            poll_interval_secs: 2,
            poll_timeout_secs: 60,
            connect_timeout_secs: 10,
            max_connections: 5,
            require_schema: false,
            loglevel: "info".to_string(),
        }
    }
}

impl Config {
    /// Load from defaults, `config.toml` and the environment, then validate.
    pub fn load() -> Result<Self, BackendError> {
        Self::from_figment(
            Figment::from(Serialized::defaults(Config::default()))
                .merge(Toml::file(CONFIG_FILE))
                .merge(Env::prefixed(ENV_PREFIX)),
        )
    }

    pub fn from_figment(figment: Figment) -> Result<Self, BackendError> {
        let cfg: Config = figment.extract()?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn validate(&self) -> Result<(), BackendError> {
        if self.poll_interval_secs == 0 {
            return Err(BackendError::Config(
                "poll_interval_secs must be greater than zero".to_string(),
            ));
        }
        if self.poll_interval_secs > self.poll_timeout_secs {
            return Err(BackendError::Config(format!(
                "poll_interval_secs ({}) exceeds poll_timeout_secs ({})",
                self.poll_interval_secs, self.poll_timeout_secs
            )));
        }
        if self.connect_timeout_secs == 0 {
            return Err(BackendError::Config(
                "connect_timeout_secs must be greater than zero".to_string(),
            ));
        }
        if self.max_connections == 0 {
            return Err(BackendError::Config(
                "max_connections must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn poll_timeout(&self) -> Duration {
        Duration::from_secs(self.poll_timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}
