//! Tunables of the panel engine, loadable from TOML.
//!
//! ```toml
//! page_size = 20
//! search_timeout_ms = 3000
//! ```
//!
//! Missing keys fall back to [`Config::default`].

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::fs as TokioFs;
use tracing::info;

use crate::error::ConfigError;

pub const DEFAULT_PAGE_SIZE: usize = 20;
pub const DEFAULT_SEARCH_TIMEOUT_MS: u64 = 3000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Rows skipped by page-up / page-down.
    pub page_size: usize,

    /// Inactivity after which the typeahead buffer is dropped.
    pub search_timeout_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            search_timeout_ms: DEFAULT_SEARCH_TIMEOUT_MS,
        }
    }
}

impl Config {
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses the config file at `path`.
    pub async fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = TokioFs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        let config = Self::from_toml_str(&raw)?;
        info!(path = %path.display(), ?config, "config loaded");
        Ok(config)
    }

    pub fn search_timeout(&self) -> Duration {
        Duration::from_millis(self.search_timeout_ms)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.page_size == 0 {
            return Err(ConfigError::Invalid {
                field: "page_size".into(),
                message: "must be at least 1".into(),
            });
        }
        if self.search_timeout_ms == 0 {
            return Err(ConfigError::Invalid {
                field: "search_timeout_ms".into(),
                message: "must be at least 1".into(),
            });
        }
        Ok(())
    }
}
