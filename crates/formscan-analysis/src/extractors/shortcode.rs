//! Shortcode extractor: `[gravityform id="N"]` in the body.

use formscan_core::errors::ScanError;
use formscan_core::types::{Category, FormReference};

use super::traits::{Extraction, ExtractionContext, Extractor};
use crate::patterns::{may_reference_forms, shortcode_form_ids};

pub const ID: &str = "shortcode";

pub struct ShortcodeExtractor;

impl Extractor for ShortcodeExtractor {
    fn id(&self) -> &str { ID }
    fn category(&self) -> Category { Category::Shortcode }

    fn extract(&self, ctx: &ExtractionContext<'_>) -> Result<Extraction, ScanError> {
        let body = ctx.body();
        if !may_reference_forms(body) {
            return Ok(Extraction::default());
        }
        Ok(Extraction::from_references(
            shortcode_form_ids(body).into_iter().map(FormReference::shortcode),
        ))
    }
}
