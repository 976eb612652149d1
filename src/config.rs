//! Runtime configuration
//!
//! Loaded from `<data_dir>/config.yaml` when present, then overridden by
//! `BABYBEACON_API_URL` / `BABYBEACON_DATA_DIR`. A missing file means
//! defaults; a malformed one is an error.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::constants::{
    DATA_DIR_NAME, DEFAULT_API_BASE_URL, DEFAULT_LOG_FILE, DEFAULT_POLL_INTERVAL_SECS,
    DEFAULT_REQUEST_TIMEOUT_SECS,
};

pub const ENV_API_URL: &str = "BABYBEACON_API_URL";
pub const ENV_DATA_DIR: &str = "BABYBEACON_DATA_DIR";

const CONFIG_FILE: &str = "config.yaml";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_base_url: String,
    pub data_dir: PathBuf,
    pub poll_interval_secs: u64,
    pub request_timeout_secs: u64,
    /// Relative paths are resolved against `data_dir`
    pub log_file: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_base_url: String::from(DEFAULT_API_BASE_URL),
            data_dir: default_data_dir(),
            poll_interval_secs: DEFAULT_POLL_INTERVAL_SECS,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
        }
    }
}

fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DATA_DIR_NAME)
}

impl Config {
    /// Load using the process environment
    pub fn load() -> Result<Self> {
        let api_url = std::env::var(ENV_API_URL).ok();
        let data_dir = std::env::var(ENV_DATA_DIR).ok().map(PathBuf::from);
        Self::load_with(data_dir, api_url)
    }

    /// Load with explicit overrides (the environment is only read by [`Config::load`])
    pub fn load_with(data_dir: Option<PathBuf>, api_url: Option<String>) -> Result<Self> {
        let dir = data_dir.unwrap_or_else(default_data_dir);
        let mut config = Self::from_file(&dir.join(CONFIG_FILE))?.unwrap_or_default();

        // The directory the file was found in wins over whatever it says.
        config.data_dir = dir;
        if let Some(url) = api_url.filter(|u| !u.trim().is_empty()) {
            config.api_base_url = url;
        }
        config.api_base_url = config.api_base_url.trim_end_matches('/').to_string();
        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let config = serde_yaml::from_str(&content)
            .with_context(|| format!("parsing {}", path.display()))?;
        Ok(Some(config))
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs.max(1))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn log_path(&self) -> PathBuf {
        if self.log_file.is_absolute() {
            self.log_file.clone()
        } else {
            self.data_dir.join(&self.log_file)
        }
    }
}
