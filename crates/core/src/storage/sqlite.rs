//! SQLite-backed store

use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::Utc;
use rusqlite::{params, Connection};
use tracing::{debug, instrument};

use super::migrations::{current_version, upgrade};
use super::KeyValueStore;
use crate::error::Result;

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open or create the store at the given path
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        Self::init(conn)
    }

    /// Open in-memory store (for testing)
    #[instrument]
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init(conn)
    }

    fn init(mut conn: Connection) -> Result<Self> {
        let version = upgrade(&mut conn)?;
        debug!(version, "Session store ready");
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Get current schema version
    pub fn schema_version(&self) -> u32 {
        current_version(&self.conn()).unwrap_or(0)
    }

    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let conn = self.conn();
        let result = conn.query_row(
            "SELECT value FROM session_entries WHERE key = ?1",
            params![key],
            |row| row.get(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    #[instrument(skip(self, entries), fields(count = entries.len()))]
    fn put_all(&self, entries: &[(&str, &str)]) -> Result<()> {
        let mut conn = self.conn();
        let tx = conn.transaction()?;
        let now = Utc::now().to_rfc3339();
        for (key, value) in entries {
            tx.execute(
                "INSERT INTO session_entries (key, value, updated_at) VALUES (?1, ?2, ?3)
                 ON CONFLICT(key) DO UPDATE SET
                    value = excluded.value,
                    updated_at = excluded.updated_at",
                params![key, value, now],
            )?;
        }
        tx.commit()?;
        debug!("Stored session entries");
        Ok(())
    }

    #[instrument(skip(self))]
    fn remove_all(&self, keys: &[&str]) -> Result<()> {
        let mut conn = self.conn();
        let tx = conn.transaction()?;
        for key in keys {
            tx.execute("DELETE FROM session_entries WHERE key = ?1", params![key])?;
        }
        tx.commit()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::latest_version;

    #[test]
    fn test_schema_version() {
        let store = SqliteStore::open_in_memory().unwrap();
        assert_eq!(store.schema_version(), latest_version());
    }

    #[test]
    fn test_overwrite_and_remove() {
        let store = SqliteStore::open_in_memory().unwrap();
        store.put_all(&[("k", "one")]).unwrap();
        store.put_all(&[("k", "two"), ("other", "x")]).unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("two"));

        store.remove_all(&["k", "other"]).unwrap();
        assert!(store.get("k").unwrap().is_none());
        assert!(store.get("other").unwrap().is_none());
    }

    #[test]
    fn test_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.db");

        {
            let store = SqliteStore::open(&path).unwrap();
            store.put_all(&[("session_token", "t")]).unwrap();
        }

        let store = SqliteStore::open(&path).unwrap();
        assert_eq!(store.get("session_token").unwrap().as_deref(), Some("t"));
    }
}
