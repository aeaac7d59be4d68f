//! SQLite-backed metadata store.
//!
//! One `meta` table of key/blob pairs. Failures are logged and reported
//! through the lossy [`MetaStore`] contract rather than returned.

use rusqlite::{Connection, OptionalExtension, TransactionBehavior, params};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::warn;

use crate::error::{VariableError, VariableResult};
use crate::meta_store::{CasOutcome, MetaStore};

const SELECT_VALUE: &str = "SELECT value FROM meta WHERE key = ?1";
const UPSERT_VALUE: &str = "INSERT OR REPLACE INTO meta (key, value) VALUES (?1, ?2)";

/// Persistent metadata store backed by SQLite.
#[derive(Clone)]
pub struct SqliteMetaStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteMetaStore {
    /// Opens (or creates) a store at the given path.
    pub fn open(path: impl AsRef<Path>) -> VariableResult<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path).map_err(|e| {
            VariableError::Storage(format!("failed to open {}: {e}", path.display()))
        })?;
        Self::with_connection(conn)
    }

    /// Opens an in-memory store (for testing).
    pub fn open_in_memory() -> VariableResult<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| VariableError::Storage(format!("failed to open in-memory store: {e}")))?;
        Self::with_connection(conn)
    }

    fn with_connection(conn: Connection) -> VariableResult<Self> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS meta (
                key TEXT PRIMARY KEY,
                value BLOB NOT NULL
            );",
        )
        .map_err(|e| VariableError::Storage(format!("failed to init meta schema: {e}")))?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn lock(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn try_compare_and_write(
    conn: &mut Connection,
    key: &str,
    expected: Option<&[u8]>,
    blob: &[u8],
) -> rusqlite::Result<CasOutcome> {
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
    let current: Option<Vec<u8>> = tx
        .query_row(SELECT_VALUE, params![key], |row| row.get(0))
        .optional()?;
    if current.as_deref() != expected {
        return Ok(CasOutcome::Conflict);
    }
    tx.execute(UPSERT_VALUE, params![key, blob])?;
    tx.commit()?;
    Ok(CasOutcome::Written)
}

impl MetaStore for SqliteMetaStore {
    fn read(&self, key: &str) -> Option<Vec<u8>> {
        let conn = self.lock();
        match conn
            .query_row(SELECT_VALUE, params![key], |row| row.get(0))
            .optional()
        {
            Ok(value) => value,
            Err(e) => {
                warn!(key, error = %e, "Failed to read meta value, treating as absent");
                None
            }
        }
    }

    fn write(&self, key: &str, blob: &[u8]) -> bool {
        let conn = self.lock();
        match conn.execute(UPSERT_VALUE, params![key, blob]) {
            Ok(_) => true,
            Err(e) => {
                warn!(key, error = %e, "Failed to write meta value");
                false
            }
        }
    }

    fn compare_and_write(&self, key: &str, expected: Option<&[u8]>, blob: &[u8]) -> CasOutcome {
        let mut conn = self.lock();
        match try_compare_and_write(&mut conn, key, expected, blob) {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(key, error = %e, "Compare-and-set write failed");
                CasOutcome::Failed
            }
        }
    }
}
