//! Durable key-value storage for the session mirror
//!
//! The session store only ever needs a handful of string entries that must
//! survive a restart. Multi-key writes and removals are atomic: a reader never
//! sees a token without its user or the other way round.

mod memory;
mod migrations;
mod sqlite;

use crate::error::Result;

pub use memory::MemoryStore;
pub use migrations::latest_version;
pub use sqlite::SqliteStore;

/// String-keyed persistent store
pub trait KeyValueStore: Send + Sync {
    /// Read one entry
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Insert or overwrite every entry in one atomic step
    fn put_all(&self, entries: &[(&str, &str)]) -> Result<()>;

    /// Remove every key in one atomic step; absent keys are ignored
    fn remove_all(&self, keys: &[&str]) -> Result<()>;
}
