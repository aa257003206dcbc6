//! Transport configuration
//! Loaded from transport.toml

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::TransportError;
use crate::runner::RunOptions;

/// Transport configuration
/// Loaded from transport.toml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransportConfig {
    /// Remote user the engine connects as
    #[serde(default = "default_remote_user")]
    pub remote_user: String,

    /// Parallel connection slots the engine may use
    #[serde(default = "default_forks")]
    pub forks: usize,

    /// SSH connect timeout in seconds
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

fn default_remote_user() -> String {
    "root".to_string()
}

fn default_forks() -> usize {
    1
}

fn default_connect_timeout_secs() -> u64 {
    60
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            remote_user: default_remote_user(),
            forks: default_forks(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

impl TransportConfig {
    /// Load configuration from file
    pub fn load(config_dir: &std::path::Path) -> Result<Self, TransportError> {
        let config_paths = vec![
            PathBuf::from("transport.toml"),
            config_dir.join("transport.toml"),
        ];

        for path in config_paths {
            if path.exists() {
                let content = std::fs::read_to_string(&path)?;

                let config: TransportConfig = toml::from_str(&content).map_err(|e| {
                    TransportError::Config(format!(
                        "Failed to parse config file {:?}: {}",
                        path, e
                    ))
                })?;

                tracing::info!("[TransportConfig] Loaded config from {:?}", path);
                return Ok(config);
            }
        }

        tracing::warn!("[TransportConfig] No transport.toml found, using defaults");
        Ok(Self::default())
    }

    pub fn run_options(&self) -> RunOptions {
        RunOptions {
            remote_user: self.remote_user.clone(),
            forks: self.forks,
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
        }
    }
}
