//! Widget-type builder (Elementor).
//!
//! Layout lives in `_elementor_data`: a list of elements, each with an
//! `elements` child list. A widget is a form widget when its `widgetType`
//! carries a vendor marker; the form id sits in `settings` under one of
//! several key names.

use formscan_core::config::DetectionConfig;
use formscan_core::errors::{ParseError, ScanError};
use formscan_core::types::{Category, FormId, FormReference, SmallVec4};
use serde_json::{Map, Value};

use super::traits::{Extraction, ExtractionContext, Extractor};
use super::{contains_marker, merge_keys, vendor_markers};
use crate::metadata::{as_tree, value_as_form_id};
use crate::walker::WidgetWalker;

pub const ID: &str = "elementor";
pub const DATA_KEY: &str = "_elementor_data";
pub const DEFAULT_FORM_KEYS: [&str; 5] = ["form_id", "gform_id", "gravity_form", "form", "gravityform_id"];

pub struct ElementorExtractor {
    form_keys: Vec<String>,
    markers: Vec<String>,
}

impl ElementorExtractor {
    pub fn new() -> Self {
        Self::from_config(&DetectionConfig::default())
    }

    pub fn from_config(config: &DetectionConfig) -> Self {
        Self {
            form_keys: merge_keys(&DEFAULT_FORM_KEYS, &config.elementor_form_keys),
            markers: vendor_markers(config),
        }
    }

    fn match_widget(&self, node: &Map<String, Value>) -> SmallVec4<FormId> {
        let is_form_widget = node
            .get("widgetType")
            .and_then(Value::as_str)
            .is_some_and(|kind| contains_marker(kind, &self.markers));
        if !is_form_widget {
            return SmallVec4::new();
        }
        // Empty settings serialize as `[]`.
        let Some(settings) = node.get("settings").and_then(Value::as_object) else {
            return SmallVec4::new();
        };
        self.form_keys
            .iter()
            .filter_map(|key| settings.get(key))
            .filter_map(value_as_form_id)
            .collect()
    }
}

impl Default for ElementorExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl Extractor for ElementorExtractor {
    fn id(&self) -> &str { ID }
    fn category(&self) -> Category { Category::Builder }

    fn extract(&self, ctx: &ExtractionContext<'_>) -> Result<Extraction, ScanError> {
        let Some(raw) = ctx.meta(DATA_KEY) else {
            return Ok(Extraction::default());
        };
        let tree = as_tree(DATA_KEY, &raw, ctx.max_depth)?;
        match &*tree {
            Value::Null => return Ok(Extraction::default()),
            Value::Array(_) | Value::Object(_) => {}
            _ => {
                return Err(ParseError::UnexpectedShape {
                    key: DATA_KEY.to_string(),
                    expected: "a list of layout elements",
                }
                .into())
            }
        }

        let outcome = WidgetWalker::new(ctx.max_depth).walk(&tree, |node| self.match_widget(node));
        if outcome.truncated {
            tracing::debug!(
                document_id = ctx.document.id,
                max_depth = ctx.max_depth,
                "elementor layout truncated at depth ceiling"
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
