//! Pattern library: stateless text matchers, one per embedding convention.
//!
//! Every matcher is total over `&str`: unmatched or malformed input yields an
//! empty result. Captures are digit runs parsed as base-10; a capture that
//! does not fit a `FormId` is dropped rather than reported.

use std::sync::LazyLock;

use formscan_core::types::{FormId, SmallVec4};
use regex::Regex;

/// Declare a lazily compiled pattern. A pattern that fails to compile
/// degrades to `None` and matches nothing.
macro_rules! form_pattern {
    ($name:ident, $regex_str:expr) => {
        pub static $name: std::sync::LazyLock<Option<regex::Regex>> =
            std::sync::LazyLock::new(|| regex::Regex::new($regex_str).ok());
    };
}

pub mod addon;
pub mod block;
pub mod builder_tags;
pub mod fingerprints;
pub mod prefilter;
pub mod shortcode;

pub use addon::AddonHeuristic;
pub use block::block_form_ids;
pub use builder_tags::{default_builder_tags, BuilderTagPattern};
pub use fingerprints::rendered_form_ids;
pub use prefilter::may_reference_forms;
pub use shortcode::{has_login_form, shortcode_form_ids};

/// Parse a captured digit run. Overflow drops the id.
pub fn parse_id(digits: &str) -> Option<FormId> {
    digits.trim().parse::<FormId>().ok()
}

/// Collect capture group 1 of every match as a form id.
pub fn capture_ids(regex: &LazyLock<Option<Regex>>, text: &str) -> SmallVec4<FormId> {
    match regex.as_ref() {
        Some(re) => captures_of(re, text),
        None => SmallVec4::new(),
    }
}

/// Same as [`capture_ids`] for an already compiled regex.
pub fn captures_of(re: &Regex, text: &str) -> SmallVec4<FormId> {
    re.captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .filter_map(|m| parse_id(m.as_str()))
        .collect()
}

/// Whether the pattern matches anywhere in `text`.
pub fn is_match(regex: &LazyLock<Option<Regex>>, text: &str) -> bool {
    regex.as_ref().is_some_and(|re| re.is_match(text))
}
