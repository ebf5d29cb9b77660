//! Connection to a site database.

use std::path::Path;
use std::sync::Mutex;

use formscan_core::errors::RetrievalError;
use rusqlite::{Connection, OpenFlags};

/// Default WordPress table prefix.
pub const DEFAULT_PREFIX: &str = "wp_";

/// A single SQLite connection plus the site's table prefix.
///
/// The scanner only reads, so one serialized connection is enough.
pub struct SiteDatabase {
    conn: Mutex<Connection>,
    prefix: String,
}

impl SiteDatabase {
    /// Open an existing database read-only.
    pub fn open(path: &Path, prefix: &str) -> Result<Self, RetrievalError> {
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(|e| RetrievalError::Unavailable {
            reason: format!("{}: {e}", path.display()),
        })?;
        Self::from_connection(conn, prefix)
    }

    /// Wrap an already open connection (in-memory databases, tests).
    pub fn from_connection(conn: Connection, prefix: &str) -> Result<Self, RetrievalError> {
        if !is_valid_prefix(prefix) {
            return Err(RetrievalError::Unavailable {
                reason: format!("invalid table prefix '{prefix}'"),
            });
        }
        Ok(Self {
            conn: Mutex::new(conn),
            prefix: prefix.to_string(),
        })
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Prefixed table name, e.g. `wp_posts`.
    pub fn table(&self, name: &str) -> String {
        format!("{}{}", self.prefix, name)
    }

    /// Execute a closure with the connection.
    pub fn with_conn<F, T>(&self, f: F) -> Result<T, RetrievalError>
    where
        F: FnOnce(&Connection) -> Result<T, RetrievalError>,
    {
        let guard = self.conn.lock().map_err(|_| RetrievalError::Unavailable {
            reason: "connection lock poisoned".to_string(),
        })?;
        f(&guard)
    }

    /// Whether the prefixed table exists.
    pub fn has_table(&self, name: &str) -> Result<bool, RetrievalError> {
        let table = self.table(name);
        self.with_conn(|conn| {
            conn.query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
                [&table],
                |row| row.get::<_, i64>(0),
            )
            .map(|count| count > 0)
            .map_err(query_failed)
        })
    }
}

impl std::fmt::Debug for SiteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SiteDatabase")
            .field("prefix", &self.prefix)
            .finish()
    }
}

/// Table prefixes are interpolated into SQL, so only identifier characters pass.
pub(crate) fn is_valid_prefix(prefix: &str) -> bool {
    prefix
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_')
}

pub(crate) fn query_failed(e: rusqlite::Error) -> RetrievalError {
    RetrievalError::QueryFailed {
        message: e.to_string(),
    }
}
