//! Form status resolution against the forms plugin's table.

use std::sync::Arc;

use formscan_core::errors::RetrievalError;
use formscan_core::traits::{FormRecord, FormRecordStore, FormStatusResolver};
use formscan_core::types::{FormId, FormStatus};
use rusqlite::{params, OptionalExtension};

use crate::connection::{query_failed, SiteDatabase};

/// `{prefix}gf_form` as a form record store.
#[derive(Debug, Clone)]
pub struct SqliteFormStore {
    db: Arc<SiteDatabase>,
}

impl SqliteFormStore {
    pub fn new(db: Arc<SiteDatabase>) -> Self {
        Self { db }
    }
}

impl FormRecordStore for SqliteFormStore {
    /// The plugin is considered installed when its forms table exists.
    fn is_available(&self) -> bool {
        self.db.has_table("gf_form").unwrap_or(false)
    }

    fn find_form(&self, form_id: FormId) -> Result<Option<FormRecord>, RetrievalError> {
        let Ok(sql_id) = i64::try_from(form_id) else {
            return Ok(None);
        };
        let sql = format!(
            "SELECT id, title, is_active, is_trash FROM {} WHERE id = ?1",
            self.db.table("gf_form")
        );
        self.db.with_conn(|conn| {
            conn.query_row(&sql, params![sql_id], |row| {
                Ok(FormRecord {
                    id: form_id,
                    title: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
                    is_active: row.get::<_, Option<i64>>(2)?.unwrap_or(0) != 0,
                    is_trash: row.get::<_, Option<i64>>(3)?.unwrap_or(0) != 0,
                })
            })
            .optional()
            .map_err(query_failed)
        })
    }
}

/// Classifies form ids from stored form records.
///
/// Store unavailable: `Unknown`. Trashed: `Trash`. No record: `Deleted`.
/// Otherwise `Active` or `Inactive` from the active flag. A failed lookup
/// is `Unknown`; nothing is cached.
#[derive(Debug, Clone)]
pub struct StoredStatusResolver<S: FormRecordStore> {
    store: S,
}

impl<S: FormRecordStore> StoredStatusResolver<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

impl<S: FormRecordStore> FormStatusResolver for StoredStatusResolver<S> {
    fn resolve(&self, form_id: FormId) -> FormStatus {
        if !self.store.is_available() {
            return FormStatus::Unknown;
        }
        match self.store.find_form(form_id) {
            Ok(Some(record)) if record.is_trash => FormStatus::Trash,
            Ok(Some(record)) if record.is_active => FormStatus::Active,
            Ok(Some(_)) => FormStatus::Inactive,
            Ok(None) => FormStatus::Deleted,
            Err(e) => {
                tracing::warn!(form_id, error = %e, "form status lookup failed");
                FormStatus::Unknown
            }
        }
    }
}
