//! Runtime configuration
//!
//! Loaded from a TOML file. Every section and field is optional; anything
//! missing falls back to the defaults below.
//!
//! ```toml
//! [latency]
//! list_ms = 500
//! get_ms = 300
//! write_ms = 500
//! auth_ms = 1000
//! stats_ms = 300
//!
//! [storage]
//! backend = "sqlite"
//! path = "/tmp/cloudboard.db"
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::error::{Error, Result};

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CloudboardConfig {
    pub latency: LatencyConfig,
    pub storage: StorageConfig,
}

impl CloudboardConfig {
    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(e.to_string()))
    }

    /// Load configuration from a file; a missing file yields the defaults
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            debug!("No config file, using defaults");
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }
}

/// Simulated latency per operation class, in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LatencyConfig {
    pub list_ms: u64,
    pub get_ms: u64,
    pub write_ms: u64,
    pub auth_ms: u64,
    pub stats_ms: u64,
}

impl Default for LatencyConfig {
    fn default() -> Self {
        Self {
            list_ms: 500,
            get_ms: 300,
            write_ms: 500,
            auth_ms: 1000,
            stats_ms: 300,
        }
    }
}

impl LatencyConfig {
    /// No simulated delay at all (tests, scripted runs)
    pub fn zero() -> Self {
        Self {
            list_ms: 0,
            get_ms: 0,
            write_ms: 0,
            auth_ms: 0,
            stats_ms: 0,
        }
    }

    pub fn list(&self) -> Duration {
        Duration::from_millis(self.list_ms)
    }

    pub fn get(&self) -> Duration {
        Duration::from_millis(self.get_ms)
    }

    pub fn write(&self) -> Duration {
        Duration::from_millis(self.write_ms)
    }

    pub fn auth(&self) -> Duration {
        Duration::from_millis(self.auth_ms)
    }

    pub fn stats(&self) -> Duration {
        Duration::from_millis(self.stats_ms)
    }
}

/// Where the session mirror is kept
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Memory,
    #[default]
    Sqlite,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    /// Database file for the sqlite backend; defaults to the app data dir
    pub path: Option<PathBuf>,
}

/// Sleep for the simulated latency of one operation
pub async fn simulate_latency(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}
