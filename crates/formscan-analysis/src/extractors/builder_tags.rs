//! Builder shortcode extractor: one instance per builder, holding every tag
//! that builder uses.

use formscan_core::errors::ScanError;
use formscan_core::types::{Category, FormReference};

use super::traits::{Extraction, ExtractionContext, Extractor};
use crate::patterns::BuilderTagPattern;

pub struct BuilderTagExtractor {
    id: String,
    builder: String,
    patterns: Vec<BuilderTagPattern>,
}

impl BuilderTagExtractor {
    pub fn new(builder: impl Into<String>, patterns: Vec<BuilderTagPattern>) -> Self {
        let builder = builder.into();
        Self {
            id: format!("{builder}-shortcode"),
            builder,
            patterns,
        }
    }

    pub fn builder(&self) -> &str {
        &self.builder
    }

    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.patterns.iter().map(BuilderTagPattern::tag)
    }
}

impl Extractor for BuilderTagExtractor {
    fn id(&self) -> &str { &self.id }
    fn category(&self) -> Category { Category::Builder }

    fn extract(&self, ctx: &ExtractionContext<'_>) -> Result<Extraction, ScanError> {
        let body = ctx.body();
        if !body.contains('[') {
            return Ok(Extraction::default());
        }
        let references = self
            .patterns
            .iter()
            .flat_map(|pattern| pattern.form_ids(body))
            .map(|id| FormReference::builder(id, self.builder.as_str()));
        Ok(Extraction::from_references(references))
    }
}
