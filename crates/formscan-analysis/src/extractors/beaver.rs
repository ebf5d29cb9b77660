//! Module builder (Beaver Builder).
//!
//! `_fl_builder_data` holds node records keyed by node id (or a plain list).
//! A form module has `type == "module"` and a module slug carrying a vendor
//! marker. Decoding ambiguity means the form id may appear as a nested
//! `settings` map, as flattened `settings.key` / `settings[key]` entries on
//! the node, or inside a `settings` string that is itself serialized.

use std::borrow::Cow;

use formscan_core::config::DetectionConfig;
use formscan_core::errors::{ParseError, ScanError};
use formscan_core::types::{Category, FormId, FormReference, SmallVec4};
use serde_json::{Map, Value};

use super::traits::{Extraction, ExtractionContext, Extractor};
use super::{contains_marker, merge_keys, vendor_markers};
use crate::metadata::{as_tree, decode_text, value_as_form_id};
use crate::walker::{WalkOutcome, WidgetWalker};

pub const ID: &str = "beaver-builder";
pub const DATA_KEY: &str = "_fl_builder_data";
pub const DEFAULT_FORM_KEYS: [&str; 4] = ["form_id", "gform_id", "select_form", "gravity_form"];

pub struct BeaverExtractor {
    form_keys: Vec<String>,
    markers: Vec<String>,
}

impl BeaverExtractor {
    pub fn new() -> Self {
        Self::from_config(&DetectionConfig::default())
    }

    pub fn from_config(config: &DetectionConfig) -> Self {
        Self {
            form_keys: merge_keys(&DEFAULT_FORM_KEYS, &config.beaver_form_keys),
            markers: vendor_markers(config),
        }
    }

    fn match_module(&self, node: &Map<String, Value>, max_depth: usize) -> SmallVec4<FormId> {
        let is_module = node
            .get("type")
            .and_then(Value::as_str)
            .is_some_and(|kind| kind.eq_ignore_ascii_case("module"));
        if !is_module {
            return SmallVec4::new();
        }

        let settings = settings_map(node, max_depth);
        let slug = settings
            .as_deref()
            .and_then(|s| s.get("type"))
            .or_else(|| flat_setting(node, "type"))
            .or_else(|| node.get("module"))
            .and_then(Value::as_str);
        if !slug.is_some_and(|slug| contains_marker(slug, &self.markers)) {
            return SmallVec4::new();
        }

        let mut ids = SmallVec4::new();
        for key in &self.form_keys {
            let nested = settings.as_deref().and_then(|s| s.get(key));
            let value = nested.or_else(|| flat_setting(node, key));
            if let Some(id) = value.and_then(value_as_form_id) {
                ids.push(id);
            }
        }
        ids
    }
}

impl Default for BeaverExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// The node's settings as a map: nested, or decoded from serialized text.
fn settings_map(node: &Map<String, Value>, max_depth: usize) -> Option<Cow<'_, Map<String, Value>>> {
    match node.get("settings")? {
        Value::Object(map) => Some(Cow::Borrowed(map)),
        Value::String(text) => match decode_text("settings", text, max_depth) {
            Ok(Value::Object(map)) => Some(Cow::Owned(map)),
            Ok(_) => None,
            Err(e) => {
                tracing::debug!(error = %e, "skipping undecodable module settings");
                None
            }
        },
        _ => None,
    }
}

/// `settings.key` or `settings[key]` stored directly on the node.
fn flat_setting<'n>(node: &'n Map<String, Value>, key: &str) -> Option<&'n Value> {
    node.get(&format!("settings.{key}"))
        .or_else(|| node.get(&format!("settings[{key}]")))
}

fn is_node(map: &Map<String, Value>) -> bool {
    map.contains_key("type") || map.contains_key("node")
}

impl Extractor for BeaverExtractor {
    fn id(&self) -> &str { ID }
    fn category(&self) -> Category { Category::Builder }

    fn extract(&self, ctx: &ExtractionContext<'_>) -> Result<Extraction, ScanError> {
        let Some(raw) = ctx.meta(DATA_KEY) else {
            return Ok(Extraction::default());
        };
        let tree = as_tree(DATA_KEY, &raw, ctx.max_depth)?;

        let walker = WidgetWalker::new(ctx.max_depth);
        let matcher = |node: &Map<String, Value>| self.match_module(node, ctx.max_depth);
        let mut outcome = WalkOutcome::default();
        match &*tree {
            Value::Null => return Ok(Extraction::default()),
            Value::Object(map) if is_node(map) => outcome = walker.walk(&tree, matcher),
            // Node id -> node record.
            Value::Object(map) => {
                for node in map.values() {
                    outcome.merge(walker.walk(node, matcher));
                }
            }
            Value::Array(_) => outcome = walker.walk(&tree, matcher),
            _ => {
                return Err(ParseError::UnexpectedShape {
                    key: DATA_KEY.to_string(),
                    expected: "a map or list of node records",
                }
                .into())
            }
        }

        if outcome.truncated {
            tracing::debug!(
                document_id = ctx.document.id,
                max_depth = ctx.max_depth,
                "beaver layout truncated at depth ceiling"
            );
        }
        if outcome.ids.is_empty() {
            return Ok(Extraction::fallback());
        }
        Ok(Extraction::from_references(
            outcome.ids.into_iter().map(|id| FormReference::builder(id, ID)),
        ))
    }
}
