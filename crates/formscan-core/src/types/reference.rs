//! Form references and the categories they are reported under.

use serde::{Deserialize, Serialize};

/// Identifier of an external form.
pub type FormId = u64;

/// Where a form reference was found.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SourceKind {
    /// The vendor's own inline tag.
    Shortcode,
    /// JSON-configured editor block.
    Block,
    /// A page builder, by registry name.
    Builder(String),
    /// Low-confidence co-occurrence heuristic.
    AddonPattern,
}

impl SourceKind {
    pub fn category(&self) -> Category {
        match self {
            Self::Shortcode => Category::Shortcode,
            Self::Block => Category::Block,
            Self::Builder(_) | Self::AddonPattern => Category::Builder,
        }
    }
}

/// The three id sets a document result reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Shortcode,
    Block,
    Builder,
}

impl Category {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Shortcode => "shortcode",
            Self::Block => "block",
            Self::Builder => "builder",
        }
    }
}

/// A single detected reference to a form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FormReference {
    pub form_id: FormId,
    pub source: SourceKind,
}

impl FormReference {
    pub fn new(form_id: FormId, source: SourceKind) -> Self {
        Self { form_id, source }
    }

    pub fn shortcode(form_id: FormId) -> Self {
        Self::new(form_id, SourceKind::Shortcode)
    }

    pub fn block(form_id: FormId) -> Self {
        Self::new(form_id, SourceKind::Block)
    }

    pub fn builder(form_id: FormId, builder: impl Into<String>) -> Self {
        Self::new(form_id, SourceKind::Builder(builder.into()))
    }

    pub fn addon(form_id: FormId) -> Self {
        Self::new(form_id, SourceKind::AddonPattern)
    }

    pub fn category(&self) -> Category {
        self.source.category()
    }
}
