//! The Extractor trait and its per-document context.

use std::borrow::Cow;

use formscan_core::errors::ScanError;
use formscan_core::traits::DocumentSource;
use formscan_core::types::{Category, Document, FormReference};
use serde_json::Value;

/// Everything an extractor may read for one document.
#[derive(Clone, Copy)]
pub struct ExtractionContext<'a> {
    pub document: &'a Document,
    pub source: Option<&'a dyn DocumentSource>,
    /// Depth ceiling for metadata decoding and tree walks.
    pub max_depth: usize,
}

impl<'a> ExtractionContext<'a> {
    pub fn new(
        document: &'a Document,
        source: Option<&'a dyn DocumentSource>,
        max_depth: usize,
    ) -> Self {
        Self {
            document,
            source,
            max_depth,
        }
    }

    pub fn body(&self) -> &'a str {
        &self.document.body
    }

    /// Metadata carried on the document, else looked up from the source.
    pub fn meta(&self, key: &str) -> Option<Cow<'a, Value>> {
        if let Some(value) = self.document.meta(key) {
            return Some(Cow::Borrowed(value));
        }
        self.source
            .and_then(|source| source.metadata(self.document.id, key))
            .map(Cow::Owned)
    }

    /// The body followed by every metadata value on the document as text.
    ///
    /// Pre-decoded values are rendered as compact JSON so text matchers see
    /// the same `"key":value` pairs they would find in the stored form.
    pub fn texts(&self) -> impl Iterator<Item = Cow<'a, str>> + 'a {
        let document = self.document;
        std::iter::once(Cow::Borrowed(document.body.as_str())).chain(
            document.metadata.values().filter_map(|value| match value {
                Value::String(text) => Some(Cow::Borrowed(text.as_str())),
                Value::Null => None,
                other => Some(Cow::Owned(other.to_string())),
            }),
        )
    }
}

impl std::fmt::Debug for ExtractionContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExtractionContext")
            .field("document", &self.document.id)
            .field("has_source", &self.source.is_some())
            .field("max_depth", &self.max_depth)
            .finish()
    }
}

/// What one extractor found in one document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    pub references: Vec<FormReference>,
    pub login_form: bool,
    /// Set by structured extractors whose metadata was present but held no
    /// reference, asking the scanner to try the rendered-content fallback.
    pub fallback_requested: bool,
}

impl Extraction {
    pub fn from_references(references: impl IntoIterator<Item = FormReference>) -> Self {
        Self {
            references: references.into_iter().collect(),
            ..Self::default()
        }
    }

    pub fn login() -> Self {
        Self {
            login_form: true,
            ..Self::default()
        }
    }

    pub fn fallback() -> Self {
        Self {
            fallback_requested: true,
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.references.is_empty() && !self.login_form
    }
}

/// A matcher or parser for one embedding convention.
pub trait Extractor: Send + Sync {
    fn id(&self) -> &str;

    /// The result category this extractor's references land in.
    fn category(&self) -> Category;

    fn extract(&self, ctx: &ExtractionContext<'_>) -> Result<Extraction, ScanError>;
}
