//! Addon heuristic extractor. Low confidence: it only reports `form_id`
//! pairs that sit near a vendor marker, in the body or in metadata.

use formscan_core::errors::ScanError;
use formscan_core::types::{Category, FormReference};

use super::traits::{Extraction, ExtractionContext, Extractor};
use crate::patterns::{may_reference_forms, AddonHeuristic};

pub const ID: &str = "addon-heuristic";

pub struct AddonExtractor {
    heuristic: AddonHeuristic,
}

impl AddonExtractor {
    pub fn new(heuristic: AddonHeuristic) -> Self {
        Self { heuristic }
    }
}

impl Extractor for AddonExtractor {
    fn id(&self) -> &str { ID }
    fn category(&self) -> Category { Category::Builder }

    fn extract(&self, ctx: &ExtractionContext<'_>) -> Result<Extraction, ScanError> {
        let references = ctx
            .texts()
            .filter(|text| may_reference_forms(text))
            .flat_map(|text| self.heuristic.form_ids(&text))
            .map(FormReference::addon);
        Ok(Extraction::from_references(references))
    }
}
