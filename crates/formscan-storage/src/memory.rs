//! In-memory document source for callers that already hold their records.

use std::collections::BTreeMap;

use formscan_core::errors::{RenderError, RetrievalError};
use formscan_core::traits::DocumentSource;
use formscan_core::types::Document;
use serde_json::Value;

/// Status value treated as scannable.
pub const PUBLISHED: &str = "publish";

#[derive(Debug, Clone)]
struct Entry {
    document: Document,
    status: String,
}

/// Documents in insertion order, each tagged with a publication status,
/// plus optional side tables for metadata and content variants.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDocumentSource {
    entries: Vec<Entry>,
    metadata: BTreeMap<(u64, String), Value>,
    raw: BTreeMap<u64, String>,
    filtered: BTreeMap<u64, String>,
    rendered: BTreeMap<u64, Result<String, String>>,
    unavailable: Option<String>,
}

impl InMemoryDocumentSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_documents(documents: impl IntoIterator<Item = Document>) -> Self {
        let mut source = Self::new();
        for document in documents {
            source.insert(document);
        }
        source
    }

    /// Add a published document.
    pub fn insert(&mut self, document: Document) {
        self.insert_with_status(document, PUBLISHED);
    }

    pub fn insert_with_status(&mut self, document: Document, status: &str) {
        self.entries.push(Entry {
            document,
            status: status.to_string(),
        });
    }

    /// Metadata served through `DocumentSource::metadata`, not carried on the document.
    pub fn set_metadata(&mut self, document_id: u64, key: &str, value: Value) {
        self.metadata.insert((document_id, key.to_string()), value);
    }

    pub fn set_raw(&mut self, document_id: u64, content: impl Into<String>) {
        self.raw.insert(document_id, content.into());
    }

    pub fn set_filtered(&mut self, document_id: u64, content: impl Into<String>) {
        self.filtered.insert(document_id, content.into());
    }

    pub fn set_rendered(&mut self, document_id: u64, html: impl Into<String>) {
        self.rendered.insert(document_id, Ok(html.into()));
    }

    /// Make rendering this document fail.
    pub fn set_render_failure(&mut self, document_id: u64, message: impl Into<String>) {
        self.rendered.insert(document_id, Err(message.into()));
    }

    /// Make every fetch fail, as an unreachable store would.
    pub fn set_unavailable(&mut self, reason: impl Into<String>) {
        self.unavailable = Some(reason.into());
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl DocumentSource for InMemoryDocumentSource {
    fn fetch_scannable(&self) -> Result<Vec<Document>, RetrievalError> {
        if let Some(reason) = &self.unavailable {
            return Err(RetrievalError::Unavailable {
                reason: reason.clone(),
            });
        }
        Ok(self
            .entries
            .iter()
            .filter(|entry| entry.status == PUBLISHED)
            .map(|entry| entry.document.clone())
            .collect())
    }

    fn metadata(&self, document_id: u64, key: &str) -> Option<Value> {
        self.metadata.get(&(document_id, key.to_string())).cloned()
    }

    fn raw_content(&self, document_id: u64) -> Option<String> {
        self.raw.get(&document_id).cloned()
    }

    fn filtered_content(&self, document_id: u64) -> Option<String> {
        self.filtered.get(&document_id).cloned()
    }

    fn render_content(&self, document_id: u64) -> Result<String, RenderError> {
        match self.rendered.get(&document_id) {
            Some(Ok(html)) => Ok(html.clone()),
            Some(Err(message)) => Err(RenderError::Failed {
                document_id,
                message: message.clone(),
            }),
            None => Err(RenderError::Unavailable { document_id }),
        }
    }
}
