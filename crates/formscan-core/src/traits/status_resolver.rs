//! The form status collaborator.

use std::collections::BTreeMap;

use crate::errors::RetrievalError;
use crate::types::{FormId, FormStatus};

/// Classifies a form id. Resolution is lazy and uncached; callers decide
/// when (and whether) to pay for the lookups.
pub trait FormStatusResolver {
    fn resolve(&self, form_id: FormId) -> FormStatus;

    fn resolve_all<I>(&self, form_ids: I) -> BTreeMap<FormId, FormStatus>
    where
        I: IntoIterator<Item = FormId>,
        Self: Sized,
    {
        form_ids
            .into_iter()
            .map(|id| (id, self.resolve(id)))
            .collect()
    }
}

/// A form as recorded by the forms store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormRecord {
    pub id: FormId,
    pub title: String,
    pub is_active: bool,
    pub is_trash: bool,
}

/// Read access to the forms store backing a status resolver.
pub trait FormRecordStore {
    /// Whether the forms system is installed and reachable at all.
    fn is_available(&self) -> bool;

    /// Look up one form. `Ok(None)` means the form does not exist.
    fn find_form(&self, form_id: FormId) -> Result<Option<FormRecord>, RetrievalError>;
}
