//! The document record handed to the scanner by the document store.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A page, post, or other content record.
///
/// Metadata values are opaque: a value is either an already-decoded tree
/// (object, array, scalar) or a `Value::String` still holding serialized text.
/// Normalizing the two happens in the analysis crate, never here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: u64,
    pub title: String,
    /// Document type tag (e.g. "page", "post").
    pub kind: String,
    /// Raw markup as stored.
    pub body: String,
    #[serde(default)]
    pub metadata: BTreeMap<String, Value>,
}

impl Document {
    pub fn new(
        id: u64,
        title: impl Into<String>,
        kind: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            kind: kind.into(),
            body: body.into(),
            metadata: BTreeMap::new(),
        }
    }

    /// Builder-style metadata insertion.
    pub fn with_metadata(mut self, key: impl Into<String>, value: Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    pub fn meta(&self, key: &str) -> Option<&Value> {
        self.metadata.get(key)
    }
}
