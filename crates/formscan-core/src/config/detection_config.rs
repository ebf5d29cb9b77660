//! Detection configuration.

use serde::{Deserialize, Serialize};

/// An additional builder shortcode to recognize, e.g.
///
/// ```toml
/// [[detection.builder_tags]]
/// builder = "cornerstone"
/// tag = "cs_gravityform"
/// attributes = ["form_id"]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuilderTagDef {
    pub builder: String,
    pub tag: String,
    /// Attribute names carrying the form id. Default: `id`, `form_id`.
    #[serde(default)]
    pub attributes: Vec<String>,
}

impl BuilderTagDef {
    pub fn new(builder: &str, tag: &str, attributes: &[&str]) -> Self {
        Self {
            builder: builder.to_string(),
            tag: tag.to_string(),
            attributes: attributes.iter().map(|a| a.to_string()).collect(),
        }
    }

    pub fn effective_attributes(&self) -> Vec<String> {
        if self.attributes.is_empty() {
            vec!["id".to_string(), "form_id".to_string()]
        } else {
            self.attributes.clone()
        }
    }
}

/// Configuration for the extractor registry.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct DetectionConfig {
    /// Builder shortcodes recognized in addition to the built-in ones.
    #[serde(default)]
    pub builder_tags: Vec<BuilderTagDef>,
    /// Byte window for the addon co-occurrence heuristic. Default: 200.
    pub addon_window: Option<usize>,
    /// Extractor ids to leave out of the registry.
    #[serde(default)]
    pub disabled_extractors: Vec<String>,
    /// Extra settings keys holding a form id in widget-type builder data.
    #[serde(default)]
    pub elementor_form_keys: Vec<String>,
    /// Extra settings keys holding a form id in module builder data.
    #[serde(default)]
    pub beaver_form_keys: Vec<String>,
    /// Extra vendor marker tokens for widget/module discriminators.
    #[serde(default)]
    pub vendor_markers: Vec<String>,
}

impl DetectionConfig {
    pub const DEFAULT_ADDON_WINDOW: usize = 200;

    /// Returns the effective heuristic window, defaulting to 200 bytes.
    pub fn effective_addon_window(&self) -> usize {
        self.addon_window.unwrap_or(Self::DEFAULT_ADDON_WINDOW)
    }

    pub fn is_disabled(&self, extractor_id: &str) -> bool {
        self.disabled_extractors.iter().any(|d| d == extractor_id)
    }
}

/// Whether `s` is usable as a shortcode tag or attribute name.
pub fn is_valid_identifier(s: &str) -> bool {
    !s.is_empty()
        && s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}
