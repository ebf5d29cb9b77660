//! Rendered-HTML fingerprints left behind by the form renderer.
//!
//! Used by the rendered-content fallback when a builder's structured data
//! yields nothing.

use formscan_core::types::{FormId, SmallVec4};

use super::capture_ids;

form_pattern!(
    RE_WRAPPER_ID,
    r#"(?i)\bid\s*=\s*["']?gform(?:_wrapper)?_(\d+)\b"#
);
form_pattern!(
    RE_SUBMIT_FIELD,
    r#"(?i)<input[^>]*\bname\s*=\s*["']?gform_submit["']?[^>]*\bvalue\s*=\s*["']?(\d+)"#
);
form_pattern!(
    RE_SUBMIT_FIELD_REVERSED,
    r#"(?i)<input[^>]*\bvalue\s*=\s*["']?(\d+)["']?[^>]*\bname\s*=\s*["']?gform_submit\b"#
);
form_pattern!(RE_FIELDS_CLASS, r#"(?i)\bgform_fields_(\d+)\b"#);

/// Form ids evidenced by rendered markup, deduplicated, first sighting order.
pub fn rendered_form_ids(html: &str) -> SmallVec4<FormId> {
    let mut ids: SmallVec4<FormId> = SmallVec4::new();
    let found = capture_ids(&RE_WRAPPER_ID, html)
        .into_iter()
        .chain(capture_ids(&RE_SUBMIT_FIELD, html))
        .chain(capture_ids(&RE_SUBMIT_FIELD_REVERSED, html))
        .chain(capture_ids(&RE_FIELDS_CLASS, html));
    for id in found {
        if !ids.contains(&id) {
            ids.push(id);
        }
    }
    ids
}
