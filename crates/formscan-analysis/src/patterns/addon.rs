//! Low-confidence heuristic for addon-rendered builder modules.
//!
//! A `"form_id": N` pair counts only when a vendor marker appears within a
//! bounded byte window around it. No parsing happens here; the surrounding
//! text may be any fragment of serialized builder data.

use aho_corasick::{AhoCorasick, AhoCorasickBuilder};
use formscan_core::types::{FormId, SmallVec4};

use super::{is_match, parse_id};

form_pattern!(RE_FORM_ID_PAIR, r#"(?i)"form_id"\s*:\s*"?(\d+)"#);
form_pattern!(RE_MODULE_MARKER, r#"(?i)"type"\s*:\s*"module""#);
form_pattern!(RE_WIDGET_MARKER, r#"(?i)"widgetType"\s*:\s*"gravity"#);

/// Vendor tokens that mark a fragment as form-related.
pub const DEFAULT_VENDOR_MARKERS: [&str; 2] = ["gravity", "gform"];

#[derive(Debug, Clone)]
pub struct AddonHeuristic {
    window: usize,
    vendor: Option<AhoCorasick>,
}

impl AddonHeuristic {
    pub fn new(window: usize) -> Self {
        Self::with_markers(window, &[])
    }

    /// Heuristic with additional vendor marker tokens.
    pub fn with_markers(window: usize, extra_markers: &[String]) -> Self {
        let markers: Vec<&str> = DEFAULT_VENDOR_MARKERS
            .iter()
            .copied()
            .chain(extra_markers.iter().map(String::as_str))
            .filter(|m| !m.is_empty())
            .collect();
        let vendor = AhoCorasickBuilder::new()
            .ascii_case_insensitive(true)
            .build(&markers)
            .ok();
        Self {
            window: window.max(1),
            vendor,
        }
    }

    pub fn window(&self) -> usize {
        self.window
    }

    /// Form ids whose `form_id` pair sits near a marker.
    pub fn form_ids(&self, text: &str) -> SmallVec4<FormId> {
        let Some(pair) = RE_FORM_ID_PAIR.as_ref() else {
            return SmallVec4::new();
        };
        let mut ids = SmallVec4::new();
        for caps in pair.captures_iter(text) {
            let (Some(whole), Some(digits)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            let start = floor_boundary(text, whole.start().saturating_sub(self.window));
            let end = ceil_boundary(text, whole.end().saturating_add(self.window));
            if self.has_marker(&text[start..end]) {
                if let Some(id) = parse_id(digits.as_str()) {
                    ids.push(id);
                }
            }
        }
        ids
    }

    fn has_marker(&self, window: &str) -> bool {
        self.vendor.as_ref().is_some_and(|ac| ac.is_match(window))
            || is_match(&RE_MODULE_MARKER, window)
            || is_match(&RE_WIDGET_MARKER, window)
    }
}

fn floor_boundary(text: &str, mut index: usize) -> usize {
    index = index.min(text.len());
    while !text.is_char_boundary(index) {
        index -= 1;
    }
    index
}

fn ceil_boundary(text: &str, mut index: usize) -> usize {
    index = index.min(text.len());
    while !text.is_char_boundary(index) {
        index += 1;
    }
    index
}
