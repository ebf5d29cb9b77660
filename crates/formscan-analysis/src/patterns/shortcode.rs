//! The vendor's own inline tag: `[gravityform id="N" ...]`.

use formscan_core::types::{FormId, SmallVec4};

use super::{capture_ids, is_match};

form_pattern!(
    RE_SHORTCODE_FORM_ID,
    r#"(?i)\[gravityform[^\]]*id=["']?(\d+)["']?"#
);
form_pattern!(
    RE_SHORTCODE_LOGIN,
    r#"(?i)\[gravityform[^\]]*action=(?:"login"|'login'|login(?:[\s\]/]|$))"#
);

/// Form ids of every `[gravityform ... id=N]` tag, in order of appearance.
pub fn shortcode_form_ids(text: &str) -> SmallVec4<FormId> {
    capture_ids(&RE_SHORTCODE_FORM_ID, text)
}

/// Whether any tag is the login variant (`action="login"`).
pub fn has_login_form(text: &str) -> bool {
    is_match(&RE_SHORTCODE_LOGIN, text)
}
