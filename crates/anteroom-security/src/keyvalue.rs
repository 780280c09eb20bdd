// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Key-value storage backing sessions, lockout records, and the encrypted
// vault.
//
// Two implementations: a volatile in-memory map for session state (which
// must not survive a restart) and a SQLite-backed store for everything
// durable.  Callers choose which keys live where.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::Utc;
use rusqlite::{Connection, params};
use tracing::{debug, info, instrument};

use anteroom_core::error::{AnteroomError, Result};

/// Storage for string keys and string values.
///
/// All methods take `&self` so a store can be shared behind an `Arc` from
/// several threads at once.
pub trait KeyValueStore: Send + Sync {
    /// Fetch the value stored under `key`, or `None` if absent.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any existing value.
    fn put(&self, key: &str, value: &str) -> Result<()>;

    /// Delete the value stored under `key`.
    ///
    /// Removing an absent key is not an error (idempotent).
    fn remove(&self, key: &str) -> Result<()>;
}

/// Shared handle to a key-value store.
pub type SharedStore = Arc<dyn KeyValueStore>;

// ---------------------------------------------------------------------------
// In-memory store
// ---------------------------------------------------------------------------

/// Volatile store backed by a `HashMap`.
///
/// Session records live here so that closing the app ends the session.
/// Also serves as a drop-in stand-in for the SQLite store in tests.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> Result<MutexGuard<'_, HashMap<String, String>>> {
        self.entries
            .lock()
            .map_err(|_| AnteroomError::Database("memory store lock poisoned".into()))
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries()?.get(key).cloned())
    }

    fn put(&self, key: &str, value: &str) -> Result<()> {
        self.entries()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.entries()?.remove(key);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// SQLite store
// ---------------------------------------------------------------------------

/// SQLite schema for the entries table.
const CREATE_TABLE_SQL: &str = r#"
    CREATE TABLE IF NOT EXISTS kv_entries (
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )
"#;

/// Durable store backed by a SQLite database.
///
/// `rusqlite::Connection` is `Send` but not `Sync`, so the connection lives
/// behind a `Mutex` and every method serialises access through it.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open (or create) the store database at the given path.
    ///
    /// Applies WAL journal mode and creates the `kv_entries` table if it
    /// does not exist.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let conn = Connection::open(path.as_ref())
            .map_err(|e| AnteroomError::Database(format!("open: {e}")))?;

        // WAL mode survives unclean shutdowns more gracefully.
        conn.pragma_update(None, "journal_mode", "WAL")
            .map_err(|e| AnteroomError::Database(format!("WAL pragma: {e}")))?;

        conn.execute_batch(CREATE_TABLE_SQL)
            .map_err(|e| AnteroomError::Database(format!("create table: {e}")))?;

        info!("key-value database opened");
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open an in-memory database (useful for tests).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| AnteroomError::Database(format!("open in-memory: {e}")))?;

        conn.execute_batch(CREATE_TABLE_SQL)
            .map_err(|e| AnteroomError::Database(format!("create table: {e}")))?;

        debug!("in-memory key-value database opened");
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| AnteroomError::Database("connection lock poisoned".into()))
    }
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let conn = self.conn()?;
        let mut stmt = conn
            .prepare("SELECT value FROM kv_entries WHERE key = ?1")
            .map_err(|e| AnteroomError::Database(format!("prepare get: {e}")))?;

        let mut rows = stmt
            .query_map(params![key], |row| row.get::<_, String>(0))
            .map_err(|e| AnteroomError::Database(format!("query get: {e}")))?;

        match rows.next() {
            Some(Ok(value)) => Ok(Some(value)),
            Some(Err(e)) => Err(AnteroomError::Database(format!("row parse: {e}"))),
            None => Ok(None),
        }
    }

    fn put(&self, key: &str, value: &str) -> Result<()> {
        let updated_at = Utc::now().to_rfc3339();

        self.conn()?
            .execute(
                "INSERT INTO kv_entries (key, value, updated_at) VALUES (?1, ?2, ?3)
                 ON CONFLICT(key) DO UPDATE SET value = ?2, updated_at = ?3",
                params![key, value, updated_at],
            )
            .map_err(|e| AnteroomError::Database(format!("put: {e}")))?;

        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.conn()?
            .execute("DELETE FROM kv_entries WHERE key = ?1", params![key])
            .map_err(|e| AnteroomError::Database(format!("remove: {e}")))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_round_trip() {
        let store = MemoryStore::new();
        assert!(store.get("missing").expect("get").is_none());

        store.put("k", "v1").expect("put");
        assert_eq!(store.get("k").expect("get").as_deref(), Some("v1"));

        store.put("k", "v2").expect("overwrite");
        assert_eq!(store.get("k").expect("get").as_deref(), Some("v2"));

        store.remove("k").expect("remove");
        assert!(store.get("k").expect("get").is_none());
    }

    #[test]
    fn sqlite_store_round_trip() {
        let store = SqliteStore::open_in_memory().expect("open in-memory db");
        assert!(store.get("missing").expect("get").is_none());

        store.put("session", "{\"token\":\"abc\"}").expect("put");
        assert_eq!(
            store.get("session").expect("get").as_deref(),
            Some("{\"token\":\"abc\"}")
        );

        store.remove("session").expect("remove");
        assert!(store.get("session").expect("get").is_none());
    }

    #[test]
    fn sqlite_put_replaces_existing_value() {
        let store = SqliteStore::open_in_memory().expect("open in-memory db");
        store.put("attempts", "1").expect("put");
        store.put("attempts", "2").expect("put again");

        assert_eq!(store.get("attempts").expect("get").as_deref(), Some("2"));
    }

    #[test]
    fn remove_absent_key_is_idempotent() {
        let store = SqliteStore::open_in_memory().expect("open in-memory db");
        store.remove("never-stored").expect("remove first time");
        store
            .remove("never-stored")
            .expect("remove second time (idempotent)");
    }

    #[test]
    fn values_survive_reopen() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("store.db");

        {
            let store = SqliteStore::open(&path).expect("open db");
            store.put("persistent", "still here").expect("put");
        }

        let store = SqliteStore::open(&path).expect("reopen db");
        assert_eq!(
            store.get("persistent").expect("get").as_deref(),
            Some("still here")
        );
    }

    #[test]
    fn stores_are_sharable_across_threads() {
        let store: SharedStore = Arc::new(MemoryStore::new());

        let handles: Vec<_> = (0..4)
            .map(|i| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    store.put(&format!("key_{i}"), "value").expect("put");
                })
            })
            .collect();

        for handle in handles {
            handle.join().expect("thread join");
        }

        for i in 0..4 {
            assert!(store.get(&format!("key_{i}")).expect("get").is_some());
        }
    }
}
