//! Application state management
//!
//! Builds the repositories and the session store once at startup and hands
//! them to the console by reference.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use cloudboard_core::{
    seed_items, seed_users, CloudboardConfig, Error, ItemRepository, KeyValueStore, MemoryStore,
    Result, SessionStore, SqliteStore, StorageBackend, UserRepository,
};
use directories::ProjectDirs;
use tracing::info;

/// Main application state
pub struct AppState {
    pub config: CloudboardConfig,
    pub users: Arc<UserRepository>,
    pub items: Arc<ItemRepository>,
    pub session: SessionStore,
    data_dir: PathBuf,
}

impl AppState {
    /// Load config from `config_path`, or `config.toml` in the data
    /// directory, and wire everything up
    pub fn new(config_path: Option<PathBuf>) -> Result<Self> {
        let data_dir = Self::data_path()?;
        std::fs::create_dir_all(&data_dir)?;

        let config_path = config_path.unwrap_or_else(|| data_dir.join("config.toml"));
        let config = CloudboardConfig::load(&config_path)?;

        Self::with_config(config, data_dir)
    }

    /// Wire up state from an explicit config
    pub fn with_config(config: CloudboardConfig, data_dir: PathBuf) -> Result<Self> {
        let storage: Arc<dyn KeyValueStore> = match config.storage.backend {
            StorageBackend::Memory => Arc::new(MemoryStore::new()),
            StorageBackend::Sqlite => {
                let db_path = config
                    .storage
                    .path
                    .clone()
                    .unwrap_or_else(|| data_dir.join("cloudboard.db"));
                if let Some(parent) = db_path.parent() {
                    std::fs::create_dir_all(parent)?;
                }
                info!(path = %db_path.display(), "Opening session store");
                Arc::new(SqliteStore::open(&db_path)?)
            }
        };

        let latency = config.latency;
        let users = Arc::new(UserRepository::with_records(seed_users(), latency));
        let items = Arc::new(ItemRepository::with_records(seed_items(), latency));
        let session = SessionStore::new(users.clone(), storage, latency.auth())?;

        Ok(Self {
            config,
            users,
            items,
            session,
            data_dir,
        })
    }

    fn data_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("com", "cloudboard", "cloudboard").ok_or_else(|| {
            Error::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "Could not determine data directory",
            ))
        })?;

        Ok(dirs.data_dir().to_path_buf())
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}
