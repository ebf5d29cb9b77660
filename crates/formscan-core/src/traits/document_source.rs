//! The document store collaborator.

use serde_json::Value;

use crate::errors::{RenderError, RetrievalError};
use crate::types::Document;

/// Supplies documents and their side content to the scanner.
///
/// Only `fetch_scannable` is required. The accessors default to "absent",
/// which simply leaves the corresponding metadata lookup or fallback source
/// empty.
pub trait DocumentSource: Send + Sync {
    /// All documents the host considers scannable (e.g. published), in corpus order.
    fn fetch_scannable(&self) -> Result<Vec<Document>, RetrievalError>;

    /// Metadata value for a key not carried on the `Document` itself.
    fn metadata(&self, _document_id: u64, _key: &str) -> Option<Value> {
        None
    }

    /// The body as currently stored.
    fn raw_content(&self, _document_id: u64) -> Option<String> {
        None
    }

    /// The stored, host-filtered variant of the body.
    fn filtered_content(&self, _document_id: u64) -> Option<String> {
        None
    }

    /// The body after the host's rendering pipeline. Best-effort.
    fn render_content(&self, document_id: u64) -> Result<String, RenderError> {
        Err(RenderError::Unavailable { document_id })
    }
}

impl<T: DocumentSource + ?Sized> DocumentSource for &T {
    fn fetch_scannable(&self) -> Result<Vec<Document>, RetrievalError> {
        (**self).fetch_scannable()
    }

    fn metadata(&self, document_id: u64, key: &str) -> Option<Value> {
        (**self).metadata(document_id, key)
    }

    fn raw_content(&self, document_id: u64) -> Option<String> {
        (**self).raw_content(document_id)
    }

    fn filtered_content(&self, document_id: u64) -> Option<String> {
        (**self).filtered_content(document_id)
    }

    fn render_content(&self, document_id: u64) -> Result<String, RenderError> {
        (**self).render_content(document_id)
    }
}

impl<T: DocumentSource + ?Sized> DocumentSource for std::sync::Arc<T> {
    fn fetch_scannable(&self) -> Result<Vec<Document>, RetrievalError> {
        (**self).fetch_scannable()
    }

    fn metadata(&self, document_id: u64, key: &str) -> Option<Value> {
        (**self).metadata(document_id, key)
    }

    fn raw_content(&self, document_id: u64) -> Option<String> {
        (**self).raw_content(document_id)
    }

    fn filtered_content(&self, document_id: u64) -> Option<String> {
        (**self).filtered_content(document_id)
    }

    fn render_content(&self, document_id: u64) -> Result<String, RenderError> {
        (**self).render_content(document_id)
    }
}
