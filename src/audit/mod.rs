//! Audit log: a SQLite history of vault operations.
//!
//! Lives at `<data_dir>/audit.db`.  Entry names are recorded, passwords
//! never are.  Times are epoch milliseconds supplied by the caller, the
//! same clock the session gate uses.
//!
//! Logging never fails a command: an audit database that cannot be opened
//! or written is skipped.

use std::path::{Path, PathBuf};

use rusqlite::{params, Connection, Row};

use crate::errors::{LockboxError, Result};

const DB_FILE_NAME: &str = "audit.db";

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS events (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    at_ms       INTEGER NOT NULL,
    operation   TEXT NOT NULL,
    vault       TEXT NOT NULL,
    entry_name  TEXT,
    details     TEXT
);
CREATE INDEX IF NOT EXISTS events_at ON events (at_ms);";

/// One recorded operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditEntry {
    pub id: i64,
    /// Epoch milliseconds.
    pub at_ms: i64,
    pub operation: String,
    /// Vault file name the operation ran against.
    pub vault: String,
    pub entry_name: Option<String>,
    pub details: Option<String>,
}

impl AuditEntry {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            at_ms: row.get(1)?,
            operation: row.get(2)?,
            vault: row.get(3)?,
            entry_name: row.get(4)?,
            details: row.get(5)?,
        })
    }
}

/// Handle on an open audit database.
pub struct AuditLog {
    conn: Connection,
}

impl AuditLog {
    /// Open (or create) the database in `data_dir`.  `None` when that is not
    /// possible; callers carry on without auditing.
    pub fn open(data_dir: &Path) -> Option<Self> {
        let path = Self::db_path(data_dir);
        let conn = Connection::open(&path).ok()?;
        crate::vault::file::restrict_permissions(&path);
        conn.execute_batch(SCHEMA).ok()?;
        Some(Self { conn })
    }

    pub fn db_path(data_dir: &Path) -> PathBuf {
        data_dir.join(DB_FILE_NAME)
    }

    /// Record an operation at `at_ms`.  Write errors are ignored.
    pub fn log(
        &self,
        at_ms: i64,
        operation: &str,
        vault: &str,
        entry_name: Option<&str>,
        details: Option<&str>,
    ) {
        let _ = self.conn.execute(
            "INSERT INTO events (at_ms, operation, vault, entry_name, details)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![at_ms, operation, vault, entry_name, details],
        );
    }

    /// Up to `limit` entries at or after `since_ms`, newest first.
    pub fn query(&self, limit: usize, since_ms: Option<i64>) -> Result<Vec<AuditEntry>> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let since = since_ms.unwrap_or(i64::MIN);

        let mut stmt = self
            .conn
            .prepare(
                "SELECT id, at_ms, operation, vault, entry_name, details
                 FROM events
                 WHERE at_ms >= ?1
                 ORDER BY id DESC
                 LIMIT ?2",
            )
            .map_err(|e| LockboxError::AuditError(format!("query prepare: {e}")))?;

        let rows = stmt
            .query_map(params![since, limit], AuditEntry::from_row)
            .map_err(|e| LockboxError::AuditError(format!("query exec: {e}")))?;

        rows.collect::<rusqlite::Result<Vec<_>>>()
            .map_err(|e| LockboxError::AuditError(format!("row parse: {e}")))
    }
}

/// Record one operation in `data_dir`'s audit log, if it can be opened.
///
/// A missing data directory is left alone rather than created.
pub fn log_audit(
    data_dir: &Path,
    at_ms: i64,
    operation: &str,
    vault: &str,
    entry_name: Option<&str>,
    details: Option<&str>,
) {
    if !data_dir.is_dir() {
        return;
    }
    if let Some(audit) = AuditLog::open(data_dir) {
        audit.log(at_ms, operation, vault, entry_name, details);
    }
}
