//! Login-variant extractor: `[gravityform action="login"]`. Flags, never ids.

use formscan_core::errors::ScanError;
use formscan_core::types::Category;

use super::traits::{Extraction, ExtractionContext, Extractor};
use crate::patterns::{has_login_form, may_reference_forms};

pub const ID: &str = "login-form";

pub struct LoginExtractor;

impl Extractor for LoginExtractor {
    fn id(&self) -> &str { ID }
    fn category(&self) -> Category { Category::Shortcode }

    fn extract(&self, ctx: &ExtractionContext<'_>) -> Result<Extraction, ScanError> {
        let body = ctx.body();
        if may_reference_forms(body) && has_login_form(body) {
            Ok(Extraction::login())
        } else {
            Ok(Extraction::default())
        }
    }
}
