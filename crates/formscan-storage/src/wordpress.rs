//! WordPress-schema document source.

use std::sync::Arc;

use formscan_core::errors::{RenderError, RetrievalError};
use formscan_core::traits::DocumentSource;
use formscan_core::types::{Document, FxHashMap};
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::Value;

use crate::connection::{query_failed, SiteDatabase};

/// The host's content pipeline (shortcode expansion, block rendering).
/// Best-effort: a failure only costs the rendered fallback variant.
pub trait ContentRenderer: Send + Sync {
    fn render(&self, document_id: u64, content: &str) -> Result<String, RenderError>;
}

/// Reads published posts and their metadata from a site database.
///
/// Every postmeta row of a published post is carried on its `Document`,
/// exactly as stored: serialized text. Decoding is left to the analysis side.
pub struct WordPressSource {
    db: Arc<SiteDatabase>,
    renderer: Option<Box<dyn ContentRenderer>>,
}

impl WordPressSource {
    pub fn new(db: Arc<SiteDatabase>) -> Self {
        Self { db, renderer: None }
    }

    pub fn with_renderer(mut self, renderer: Box<dyn ContentRenderer>) -> Self {
        self.renderer = Some(renderer);
        self
    }

    pub fn database(&self) -> &Arc<SiteDatabase> {
        &self.db
    }

    fn post_column(&self, document_id: u64, column: &str) -> Result<Option<String>, RetrievalError> {
        let sql = format!(
            "SELECT {column} FROM {} WHERE ID = ?1",
            self.db.table("posts")
        );
        self.db.with_conn(|conn| {
            conn.query_row(&sql, params![to_sql_id(document_id)?], |row| {
                row.get::<_, Option<String>>(0)
            })
            .optional()
            .map(Option::flatten)
            .map_err(query_failed)
        })
    }
}

impl std::fmt::Debug for WordPressSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WordPressSource")
            .field("db", &self.db)
            .field("has_renderer", &self.renderer.is_some())
            .finish()
    }
}

impl DocumentSource for WordPressSource {
    fn fetch_scannable(&self) -> Result<Vec<Document>, RetrievalError> {
        let sql = format!(
            "SELECT ID, post_title, post_type, post_content FROM {} \
             WHERE post_status = 'publish' ORDER BY ID",
            self.db.table("posts")
        );
        self.db.with_conn(|conn| {
            let mut stmt = conn.prepare(&sql).map_err(query_failed)?;
            let rows = stmt
                .query_map([], |row| {
                    Ok((
                        row.get::<_, i64>(0)?,
                        row.get::<_, Option<String>>(1)?,
                        row.get::<_, Option<String>>(2)?,
                        row.get::<_, Option<String>>(3)?,
                    ))
                })
                .map_err(query_failed)?;

            let mut documents = Vec::new();
            for row in rows {
                let (id, title, kind, body) = row.map_err(query_failed)?;
                let id = u64::try_from(id).ok().filter(|id| *id >= 1).ok_or_else(|| {
                    RetrievalError::MalformedRecord {
                        document_id: 0,
                        message: format!("post id {id} is not positive"),
                    }
                })?;
                documents.push(Document::new(
                    id,
                    title.unwrap_or_default(),
                    kind.unwrap_or_default(),
                    body.unwrap_or_default(),
                ));
            }
            attach_postmeta(conn, &self.db, &mut documents)?;
            tracing::debug!(count = documents.len(), "fetched published posts");
            Ok(documents)
        })
    }

    fn metadata(&self, document_id: u64, key: &str) -> Option<Value> {
        let sql = format!(
            "SELECT meta_value FROM {} WHERE post_id = ?1 AND meta_key = ?2 \
             ORDER BY meta_id LIMIT 1",
            self.db.table("postmeta")
        );
        let result = self.db.with_conn(|conn| {
            conn.query_row(&sql, params![to_sql_id(document_id)?, key], |row| {
                row.get::<_, Option<String>>(0)
            })
            .optional()
            .map(Option::flatten)
            .map_err(query_failed)
        });
        match result {
            Ok(value) => value.map(Value::String),
            Err(e) => {
                tracing::warn!(document_id, key, error = %e, "postmeta lookup failed");
                None
            }
        }
    }

    fn raw_content(&self, document_id: u64) -> Option<String> {
        self.post_column(document_id, "post_content")
            .map_err(|e| tracing::warn!(document_id, error = %e, "post_content lookup failed"))
            .ok()
            .flatten()
    }

    fn filtered_content(&self, document_id: u64) -> Option<String> {
        self.post_column(document_id, "post_content_filtered")
            .map_err(|e| tracing::warn!(document_id, error = %e, "post_content_filtered lookup failed"))
            .ok()
            .flatten()
            .filter(|content| !content.trim().is_empty())
    }

    fn render_content(&self, document_id: u64) -> Result<String, RenderError> {
        let Some(renderer) = &self.renderer else {
            return Err(RenderError::Unavailable { document_id });
        };
        let content = self
            .post_column(document_id, "post_content")
            .map_err(|e| RenderError::Failed {
                document_id,
                message: e.to_string(),
            })?
            .unwrap_or_default();
        renderer.render(document_id, &content)
    }
}

fn to_sql_id(document_id: u64) -> Result<i64, RetrievalError> {
    i64::try_from(document_id).map_err(|_| RetrievalError::MalformedRecord {
        document_id,
        message: "id exceeds the database integer range".to_string(),
    })
}

/// Load the postmeta of every published post onto the fetched documents.
/// For a repeated key the earliest row wins, as in `metadata`.
fn attach_postmeta(
    conn: &Connection,
    db: &SiteDatabase,
    documents: &mut [Document],
) -> Result<(), RetrievalError> {
    let sql = format!(
        "SELECT m.post_id, m.meta_key, m.meta_value FROM {} m \
         JOIN {} p ON p.ID = m.post_id \
         WHERE p.post_status = 'publish' AND m.meta_key IS NOT NULL AND m.meta_value IS NOT NULL \
         ORDER BY m.meta_id",
        db.table("postmeta"),
        db.table("posts")
    );
    let index: FxHashMap<u64, usize> = documents
        .iter()
        .enumerate()
        .map(|(position, document)| (document.id, position))
        .collect();

    let mut stmt = conn.prepare(&sql).map_err(query_failed)?;
    let rows = stmt
        .query_map([], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
            ))
        })
        .map_err(query_failed)?;

    let mut attached = 0usize;
    for row in rows {
        let (post_id, key, value) = row.map_err(query_failed)?;
        let Some(&position) = u64::try_from(post_id).ok().and_then(|id| index.get(&id)) else {
            continue;
        };
        if let std::collections::btree_map::Entry::Vacant(slot) =
            documents[position].metadata.entry(key)
        {
            slot.insert(Value::String(value));
            attached += 1;
        }
    }
    tracing::debug!(attached, "attached postmeta");
    Ok(())
}
