//! Editor block attributes: `{"formId": N}` or `{"formId": "N"}`.

use formscan_core::types::{FormId, SmallVec4};

use super::capture_ids;

form_pattern!(RE_BLOCK_FORM_ID, r#"(?i)"formId"\s*:\s*"?(\d+)"?"#);

pub fn block_form_ids(text: &str) -> SmallVec4<FormId> {
    capture_ids(&RE_BLOCK_FORM_ID, text)
}
