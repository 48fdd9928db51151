//! SQLite-backed key-value store.
//!
//! One namespace holds one JSON value (typically an array of records).
//! Components never open the database themselves; they receive a
//! [`KvStore`] handle so every namespace has a single ownership point.

use std::path::Path;

use rusqlite::Connection;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info};

use crate::StoreError;

/// Namespace for the user's goal list.
pub const GOALS_NAMESPACE: &str = "rehoboam-goals";
/// Namespace for the canonical merged adoption state log.
pub const STATES_NAMESPACE: &str = "tech-tree-states";
/// Namespace for the persisted per-installation identity.
pub const USER_INSTANCE_NAMESPACE: &str = "rehoboam-user-instance";
/// Namespace for adoption records awaiting a gateway flush.
pub const OUTBOX_NAMESPACE: &str = "sync-outbox";

/// Key-value store over a single SQLite file.
pub struct KvStore {
    db: Connection,
}

impl KvStore {
    /// Open or create the store under the given data directory.
    pub fn open(data_dir: &Path) -> Result<Self, StoreError> {
        std::fs::create_dir_all(data_dir)?;
        let db_path = data_dir.join("rehoboam.db");
        let db = Connection::open(&db_path)?;
        let store = Self::init(db)?;
        info!(path = %db_path.display(), "Key-value store opened");
        Ok(store)
    }

    /// Open a throwaway in-memory store. Used by tests and dry runs.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(db: Connection) -> Result<Self, StoreError> {
        // Enable WAL mode for concurrent read access
        db.execute_batch("PRAGMA journal_mode=WAL;")?;

        db.execute_batch(
            "CREATE TABLE IF NOT EXISTS kv (
                namespace TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at INTEGER NOT NULL DEFAULT (strftime('%s', 'now'))
            );",
        )?;

        Ok(Self { db })
    }

    /// Read the value stored under a namespace, or the default when the
    /// namespace is empty.
    pub fn get_or<T: DeserializeOwned>(&self, namespace: &str, default: T) -> Result<T, StoreError> {
        let mut stmt = self
            .db
            .prepare_cached("SELECT value FROM kv WHERE namespace = ?1")?;

        let result = stmt.query_row([namespace], |row| {
            let value: String = row.get(0)?;
            Ok(value)
        });

        match result {
            Ok(raw) => Ok(serde_json::from_str(&raw)?),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(default),
            Err(e) => Err(e.into()),
        }
    }

    /// Write a value under a namespace, replacing any previous value.
    pub fn put<T: Serialize>(&self, namespace: &str, value: &T) -> Result<(), StoreError> {
        let raw = serde_json::to_string(value)?;
        self.db.execute(
            "INSERT INTO kv (namespace, value, updated_at)
             VALUES (?1, ?2, strftime('%s', 'now'))
             ON CONFLICT(namespace) DO UPDATE SET value = ?2, updated_at = strftime('%s', 'now')",
            rusqlite::params![namespace, raw],
        )?;
        debug!(namespace, bytes = raw.len(), "Wrote namespace");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_namespace_yields_default() {
        let kv = KvStore::open_in_memory().unwrap();
        let value: Vec<String> = kv.get_or("absent", Vec::new()).unwrap();
        assert!(value.is_empty());
    }

    #[test]
    fn put_then_get_round_trips() {
        let kv = KvStore::open_in_memory().unwrap();
        kv.put("ns", &vec!["a".to_string(), "b".to_string()]).unwrap();
        let value: Vec<String> = kv.get_or("ns", Vec::new()).unwrap();
        assert_eq!(value, vec!["a", "b"]);
    }

    #[test]
    fn put_replaces_previous_value() {
        let kv = KvStore::open_in_memory().unwrap();
        kv.put("ns", &1u32).unwrap();
        kv.put("ns", &2u32).unwrap();
        assert_eq!(kv.get_or::<u32>("ns", 0).unwrap(), 2);
    }

    #[test]
    fn values_survive_reopen() {
        let dir = TempDir::new().unwrap();
        {
            let kv = KvStore::open(dir.path()).unwrap();
            kv.put("ns", &"persisted".to_string()).unwrap();
        }
        let kv = KvStore::open(dir.path()).unwrap();
        assert_eq!(
            kv.get_or::<String>("ns", String::new()).unwrap(),
            "persisted"
        );
    }
}
