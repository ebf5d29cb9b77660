//! Block extractor: `"formId": N` fragments.
//!
//! Block attributes normally live in the body, but some hosts copy block
//! configuration into metadata, so every metadata value on the document is
//! scanned as well.

use formscan_core::errors::ScanError;
use formscan_core::types::{Category, FormReference};

use super::traits::{Extraction, ExtractionContext, Extractor};
use crate::patterns::{block_form_ids, may_reference_forms};

pub const ID: &str = "block";

pub struct BlockExtractor;

impl Extractor for BlockExtractor {
    fn id(&self) -> &str { ID }
    fn category(&self) -> Category { Category::Block }

    fn extract(&self, ctx: &ExtractionContext<'_>) -> Result<Extraction, ScanError> {
        let references = ctx
            .texts()
            .filter(|text| may_reference_forms(text))
            .flat_map(|text| block_form_ids(&text))
            .map(FormReference::block);
        Ok(Extraction::from_references(references))
    }
}
