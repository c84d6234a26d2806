//! Session store schema
//!
//! `schema_version` keeps one row per applied step. Opening a store applies
//! every step newer than the highest recorded version, each inside its own
//! transaction, so a store is never left half-upgraded.

use chrono::Utc;
use rusqlite::{params, Connection};
use tracing::{debug, info, instrument};

use crate::error::Result;

struct SchemaStep {
    /// Sequential, starting at 1
    version: u32,
    summary: &'static str,
    sql: &'static str,
}

const STEPS: &[SchemaStep] = &[SchemaStep {
    version: 1,
    summary: "session_entries key-value table",
    sql: "CREATE TABLE IF NOT EXISTS session_entries (
              key TEXT PRIMARY KEY,
              value TEXT NOT NULL,
              updated_at TEXT NOT NULL
          );",
}];

/// Highest applied step, 0 for a store that was never upgraded
pub(crate) fn current_version(conn: &Connection) -> Result<u32> {
    let tracked: bool = conn.query_row(
        "SELECT EXISTS (SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'schema_version')",
        [],
        |row| row.get(0),
    )?;
    if !tracked {
        return Ok(0);
    }

    let version: Option<u32> =
        conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| {
            row.get(0)
        })?;
    Ok(version.unwrap_or(0))
}

/// Apply pending steps and return the resulting version
#[instrument(skip(conn))]
pub(crate) fn upgrade(conn: &mut Connection) -> Result<u32> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_version (
             version INTEGER PRIMARY KEY,
             summary TEXT NOT NULL,
             applied_at TEXT NOT NULL
         );",
    )?;

    let from = current_version(conn)?;
    for step in STEPS.iter().filter(|step| step.version > from) {
        let tx = conn.transaction()?;
        tx.execute_batch(step.sql)?;
        tx.execute(
            "INSERT INTO schema_version (version, summary, applied_at) VALUES (?1, ?2, ?3)",
            params![step.version, step.summary, Utc::now().to_rfc3339()],
        )?;
        tx.commit()?;
        debug!(version = step.version, summary = step.summary, "Applied schema step");
    }

    let to = current_version(conn)?;
    if to > from {
        info!(from, to, "Session store schema upgraded");
    }
    Ok(to)
}

/// Schema version this build writes
pub fn latest_version() -> u32 {
    STEPS.last().map_or(0, |step| step.version)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_exists(conn: &Connection, name: &str) -> bool {
        conn.query_row(
            "SELECT EXISTS (SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1)",
            [name],
            |row| row.get(0),
        )
        .unwrap()
    }

    #[test]
    fn test_fresh_store_reaches_latest() {
        let mut conn = Connection::open_in_memory().unwrap();
        assert_eq!(current_version(&conn).unwrap(), 0);

        assert_eq!(upgrade(&mut conn).unwrap(), latest_version());
        assert!(table_exists(&conn, "session_entries"));
    }

    #[test]
    fn test_upgrade_twice_records_each_step_once() {
        let mut conn = Connection::open_in_memory().unwrap();
        upgrade(&mut conn).unwrap();
        upgrade(&mut conn).unwrap();

        let rows: usize = conn
            .query_row("SELECT COUNT(*) FROM schema_version", [], |row| row.get(0))
            .unwrap();
        assert_eq!(rows, STEPS.len());
        assert_eq!(current_version(&conn).unwrap(), latest_version());
    }

    #[test]
    fn test_step_versions_are_contiguous() {
        let versions: Vec<u32> = STEPS.iter().map(|step| step.version).collect();
        let expected: Vec<u32> = (1..=STEPS.len() as u32).collect();
        assert_eq!(versions, expected);
    }
}
