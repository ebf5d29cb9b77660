//! Minimal WordPress and forms-plugin schema.
//!
//! Only the columns the scanner reads. Used to stand up fixture databases.

use formscan_core::errors::RetrievalError;
use rusqlite::Connection;

use crate::connection::{is_valid_prefix, query_failed};

/// Create `{prefix}posts`, `{prefix}postmeta` and `{prefix}gf_form`.
pub fn create_tables(conn: &Connection, prefix: &str) -> Result<(), RetrievalError> {
    if !is_valid_prefix(prefix) {
        return Err(RetrievalError::Unavailable {
            reason: format!("invalid table prefix '{prefix}'"),
        });
    }
    conn.execute_batch(&format!(
        "CREATE TABLE IF NOT EXISTS {prefix}posts (
            ID INTEGER PRIMARY KEY,
            post_title TEXT NOT NULL DEFAULT '',
            post_type TEXT NOT NULL DEFAULT 'post',
            post_status TEXT NOT NULL DEFAULT 'publish',
            post_content TEXT NOT NULL DEFAULT '',
            post_content_filtered TEXT NOT NULL DEFAULT ''
        );
        CREATE TABLE IF NOT EXISTS {prefix}postmeta (
            meta_id INTEGER PRIMARY KEY AUTOINCREMENT,
            post_id INTEGER NOT NULL,
            meta_key TEXT,
            meta_value TEXT
        );
        CREATE INDEX IF NOT EXISTS {prefix}postmeta_post_key ON {prefix}postmeta (post_id, meta_key);
        CREATE TABLE IF NOT EXISTS {prefix}gf_form (
            id INTEGER PRIMARY KEY,
            title TEXT NOT NULL DEFAULT '',
            is_active INTEGER NOT NULL DEFAULT 1,
            is_trash INTEGER NOT NULL DEFAULT 0
        );"
    ))
    .map_err(query_failed)
}
