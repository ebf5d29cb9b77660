//! Builder-specific shortcode variants, e.g. `[et_pb_gravityform form_id="3"]`.
//!
//! Each builder ships its own tag name and its own attribute name for the form
//! id. These are instances of the inline-tag convention with different names,
//! compiled once per definition.

use formscan_core::config::detection_config::is_valid_identifier;
use formscan_core::config::BuilderTagDef;
use formscan_core::errors::PatternError;
use formscan_core::types::{FormId, SmallVec4};
use regex::Regex;

use super::captures_of;

/// Built-in builder tags.
pub fn default_builder_tags() -> Vec<BuilderTagDef> {
    vec![
        BuilderTagDef::new("divi", "et_pb_gravityform", &["form_id", "id"]),
        BuilderTagDef::new("divi", "et_pb_gravity_form", &["form_id", "id"]),
        BuilderTagDef::new("wpbakery", "vc_gravityform", &["id"]),
        BuilderTagDef::new("avada", "fusion_gravityform", &["form_id"]),
    ]
}

/// A compiled builder tag matcher.
#[derive(Debug, Clone)]
pub struct BuilderTagPattern {
    builder: String,
    tag: String,
    regex: Regex,
}

impl BuilderTagPattern {
    pub fn compile(def: &BuilderTagDef) -> Result<Self, PatternError> {
        if !is_valid_identifier(&def.tag) {
            return Err(PatternError::InvalidTag {
                builder: def.builder.clone(),
                tag: def.tag.clone(),
            });
        }
        let attributes = def.effective_attributes();
        if attributes.is_empty() {
            return Err(PatternError::NoAttributes {
                tag: def.tag.clone(),
            });
        }
        if let Some(bad) = attributes.iter().find(|a| !is_valid_identifier(a)) {
            return Err(PatternError::InvalidPattern {
                id: def.tag.clone(),
                message: format!("invalid attribute name '{bad}'"),
            });
        }

        let alternation = attributes
            .iter()
            .map(|a| regex::escape(a))
            .collect::<Vec<_>>()
            .join("|");
        // Attributes are whitespace separated, so requiring whitespace before the
        // name keeps `id` from matching inside `form_id`.
        let pattern = format!(
            r#"(?i)\[{tag}\s(?:[^\]]*?\s)?(?:{alternation})\s*=\s*["']?(\d+)"#,
            tag = regex::escape(&def.tag),
        );
        let regex = Regex::new(&pattern).map_err(|e| PatternError::InvalidPattern {
            id: def.tag.clone(),
            message: e.to_string(),
        })?;

        Ok(Self {
            builder: def.builder.clone(),
            tag: def.tag.clone(),
            regex,
        })
    }

    pub fn builder(&self) -> &str {
        &self.builder
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn form_ids(&self, text: &str) -> SmallVec4<FormId> {
        captures_of(&self.regex, text)
    }
}
