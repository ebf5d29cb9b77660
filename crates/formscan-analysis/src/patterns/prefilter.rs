//! Cheap literal pre-filter for body matchers.
//!
//! Every body convention except the builder tags contains one of these
//! tokens. A document without any of them cannot match, so the regex
//! passes are skipped.

use std::sync::LazyLock;

use aho_corasick::{AhoCorasick, AhoCorasickBuilder};

const TOKENS: [&str; 4] = ["gravity", "gform", "formid", "form_id"];

static PREFILTER: LazyLock<Option<AhoCorasick>> = LazyLock::new(|| {
    AhoCorasickBuilder::new()
        .ascii_case_insensitive(true)
        .build(TOKENS)
        .ok()
});

/// Whether `text` could contain a form reference. Errs on the side of `true`.
pub fn may_reference_forms(text: &str) -> bool {
    match PREFILTER.as_ref() {
        Some(ac) => ac.is_match(text),
        None => true,
    }
}
