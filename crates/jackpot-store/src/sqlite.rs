//! SQLite-based store implementation
//!
//! History lives in a single key-value table, mirroring the JSON-shaped
//! namespace described in the crate docs.

use chrono::{DateTime, Local};
use jackpot_api::HistoryEntry;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, warn};

use crate::{
    append_history, decode_history, decode_timestamp, encode_timestamp, PromptStore, StoreError,
    StoreResult, HISTORY_KEY, KEY_NAMESPACE, LAST_SPIN_KEY,
};

/// SQLite-based store
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open or create a store at the given path
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let conn = Connection::open(path).map_err(StoreError::read)?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        Ok(store)
    }

    /// Create an in-memory store (for testing)
    pub fn in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory().map_err(StoreError::read)?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> StoreResult<()> {
        let conn = self.lock()?;

        conn.execute_batch(
            r#"
            -- Key-value namespace (values are JSON or ISO-8601 text)
            CREATE TABLE IF NOT EXISTS kv (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );
            "#,
        )
        .map_err(StoreError::write)?;

        debug!("Store schema initialized");
        Ok(())
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| StoreError::Read("store lock poisoned".into()))
    }

    /// Overwrite a raw value (for seeding damaged data in tests)
    pub fn put_raw(&self, key: &str, value: &str) -> StoreResult<()> {
        let conn = self.lock()?;
        put(&conn, key, value)
    }
}

fn get(conn: &Connection, key: &str) -> StoreResult<Option<String>> {
    conn.query_row("SELECT value FROM kv WHERE key = ?", [key], |row| row.get(0))
        .optional()
        .map_err(StoreError::read)
}

fn put(conn: &Connection, key: &str, value: &str) -> StoreResult<()> {
    conn.execute(
        r#"
        INSERT INTO kv (key, value)
        VALUES (?, ?)
        ON CONFLICT(key)
        DO UPDATE SET value = excluded.value
        "#,
        params![key, value],
    )
    .map_err(StoreError::write)?;
    Ok(())
}

impl PromptStore for SqliteStore {
    fn append(&self, entry: &HistoryEntry) -> StoreResult<()> {
        let mut conn = self.lock()?;
        let tx = conn.transaction().map_err(StoreError::write)?;

        let payload = append_history(get(&tx, HISTORY_KEY)?.as_deref(), entry)?;

        put(&tx, HISTORY_KEY, &payload)?;
        put(&tx, LAST_SPIN_KEY, &encode_timestamp(&entry.created_at))?;
        tx.commit().map_err(StoreError::write)?;

        debug!(text = %entry.text, "History entry appended");
        Ok(())
    }

    fn read_all(&self) -> StoreResult<Vec<HistoryEntry>> {
        let conn = self.lock()?;
        match get(&conn, HISTORY_KEY)? {
            Some(payload) => decode_history(&payload),
            None => Ok(Vec::new()),
        }
    }

    fn clear(&self) -> StoreResult<()> {
        let mut conn = self.lock()?;
        let tx = conn.transaction().map_err(StoreError::write)?;

        let removed = tx
            .execute(
                "DELETE FROM kv WHERE key LIKE ? || '%'",
                [KEY_NAMESPACE],
            )
            .map_err(StoreError::write)?;
        tx.commit().map_err(StoreError::write)?;

        debug!(removed, "History cleared");
        Ok(())
    }

    fn last_spin_at(&self) -> StoreResult<Option<DateTime<Local>>> {
        let conn = self.lock()?;
        let value = get(&conn, LAST_SPIN_KEY)?;

        Ok(value.and_then(|s| {
            let parsed = decode_timestamp(&s);
            if parsed.is_none() {
                warn!(value = %s, "Ignoring unparseable last-spin marker");
            }
            parsed
        }))
    }

    fn is_healthy(&self) -> bool {
        match self.conn.lock() {
            Ok(conn) => conn.query_row("SELECT 1", [], |_| Ok(())).is_ok(),
            Err(_) => {
                warn!("Store lock poisoned");
                false
            }
        }
    }
}
