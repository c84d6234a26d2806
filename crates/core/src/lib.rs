//! Cloudboard Core Library
//!
//! Data access and session state for the Cloudboard admin dashboard: in-memory
//! user and item repositories with simulated latency, the authentication
//! session store, and the durable key-value mirror it persists to.

pub mod config;
pub mod error;
pub mod invariants;
pub mod models;
pub mod repository;
pub mod session;
pub mod stats;
pub mod storage;

pub use config::{CloudboardConfig, LatencyConfig, StorageBackend, StorageConfig};
pub use error::{Error, Result};
pub use models::*;
pub use repository::{
    seed_items, seed_users, ItemRepository, ListQuery, Page, Repository, Resource, UserRepository,
};
pub use session::{SessionStore, SHARED_PASSWORD, TOKEN_KEY, USER_KEY};
pub use stats::{dashboard_stats, DashboardStats};
pub use storage::{KeyValueStore, MemoryStore, SqliteStore};
