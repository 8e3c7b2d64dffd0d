//! SQLite key-value cache: last fetched list per range selector, for instant first paint.
//! Never authoritative; a successful live fetch always overwrites it.

use crate::error::StorageError;
use crate::models::{EventRecord, RangeSelector, Snapshot};
use crate::{rust_log, rust_warn};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

pub const DB_FILE_NAME: &str = "quakewatch.db";

pub struct Storage {
    conn: Mutex<Connection>,
    db_path: PathBuf,
}

impl Storage {
    /// Open (creating if needed) `<dir>/quakewatch.db`.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, StorageError> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)?;
        let db_path = dir.join(DB_FILE_NAME);
        rust_log!("[quakewatch] storage::open db={:?}", db_path);
        let conn = Connection::open(&db_path)?;
        create_tables(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
            db_path,
        })
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    fn with_db<F, T>(&self, f: F) -> Result<T, StorageError>
    where
        F: FnOnce(&Connection) -> Result<T, rusqlite::Error>,
    {
        // A poisoned lock only means another caller panicked mid-call; the connection itself is fine.
        let conn = self.conn.lock().unwrap_or_else(|p| p.into_inner());
        Ok(f(&conn)?)
    }

    pub fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.with_db(|conn| {
            conn.query_row("SELECT value FROM cache WHERE key = ?1", params![key], |row| row.get(0))
                .optional()
        })
    }

    pub fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let updated_at = chrono::Utc::now().to_rfc3339();
        self.with_db(|conn| {
            conn.execute(
                "INSERT INTO cache (key, value, updated_at) VALUES (?1, ?2, ?3) ON CONFLICT(key) DO UPDATE SET value = ?2, updated_at = ?3",
                params![key, value, updated_at],
            )?;
            Ok(())
        })
    }

    pub fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.with_db(|conn| {
            conn.execute("DELETE FROM cache WHERE key = ?1", params![key])?;
            Ok(())
        })
    }

    pub fn clear_all(&self) -> Result<(), StorageError> {
        self.with_db(|conn| {
            conn.execute("DELETE FROM cache", [])?;
            Ok(())
        })
    }

    /// Overwrite the cached list for `snapshot.range`.
    pub fn save_snapshot(&self, snapshot: &Snapshot) -> Result<(), StorageError> {
        let json = serde_json::to_string(snapshot)?;
        self.set(&snapshot.range.cache_key(), &json)?;
        rust_log!(
            "[quakewatch] cache: saved range={} events={}",
            snapshot.range,
            snapshot.events.len()
        );
        Ok(())
    }

    /// Cached list for `range`. A value that no longer parses reads back as `None`.
    pub fn load_snapshot(&self, range: RangeSelector) -> Result<Option<Snapshot>, StorageError> {
        let Some(json) = self.get(&range.cache_key())? else {
            return Ok(None);
        };
        match serde_json::from_str::<Snapshot>(&json) {
            Ok(snapshot) => Ok(Some(snapshot)),
            Err(e) => {
                rust_warn!("[quakewatch] cache: ignoring unreadable snapshot for range={}: {}", range, e);
                Ok(None)
            }
        }
    }

    /// Save `events` fetched live for `range`. An empty list does not replace a cached one,
    /// since the fetcher returns empty on failure too.
    pub fn store_live(&self, range: RangeSelector, events: &[EventRecord]) -> Result<bool, StorageError> {
        if events.is_empty() && self.get(&range.cache_key())?.is_some() {
            rust_log!("[quakewatch] cache: keeping previous snapshot for range={} (live fetch empty)", range);
            return Ok(false);
        }
        self.save_snapshot(&Snapshot::new(range, events.to_vec()))?;
        Ok(true)
    }
}

fn create_tables(conn: &Connection) -> Result<(), StorageError> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS cache (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}
