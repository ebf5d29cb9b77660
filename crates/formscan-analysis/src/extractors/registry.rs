//! ExtractorRegistry: ordered, runtime-extensible set of extractors.

use formscan_core::config::{BuilderTagDef, DetectionConfig};
use formscan_core::errors::PatternError;

use super::traits::Extractor;
use super::{
    AddonExtractor, BeaverExtractor, BlockExtractor, BuilderTagExtractor, ElementorExtractor,
    LoginExtractor, ShortcodeExtractor,
};
use crate::patterns::{default_builder_tags, AddonHeuristic, BuilderTagPattern};

/// Extractors in registration order. The document scanner runs them in
/// this order; results do not depend on it.
#[derive(Default)]
pub struct ExtractorRegistry {
    extractors: Vec<Box<dyn Extractor>>,
}

impl ExtractorRegistry {
    pub fn new() -> Self {
        Self {
            extractors: Vec::new(),
        }
    }

    /// Build the standard registry: body matchers, builder shortcodes,
    /// the addon heuristic, then the structured builders. Extractors listed
    /// in `disabled_extractors` are left out.
    pub fn with_defaults(config: &DetectionConfig) -> Result<Self, PatternError> {
        let mut registry = Self::new();
        let mut add = |extractor: Box<dyn Extractor>| {
            if config.is_disabled(extractor.id()) {
                tracing::debug!(extractor = extractor.id(), "extractor disabled by config");
            } else {
                registry.register(extractor);
            }
        };

        add(Box::new(ShortcodeExtractor));
        add(Box::new(LoginExtractor));
        add(Box::new(BlockExtractor));

        let defs: Vec<BuilderTagDef> = default_builder_tags()
            .into_iter()
            .chain(config.builder_tags.iter().cloned())
            .collect();
        for (builder, group) in group_by_builder(&defs) {
            let patterns = group
                .into_iter()
                .map(BuilderTagPattern::compile)
                .collect::<Result<Vec<_>, _>>()?;
            add(Box::new(BuilderTagExtractor::new(builder, patterns)));
        }

        add(Box::new(AddonExtractor::new(AddonHeuristic::with_markers(
            config.effective_addon_window(),
            &config.vendor_markers,
        ))));
        add(Box::new(ElementorExtractor::from_config(config)));
        add(Box::new(BeaverExtractor::from_config(config)));

        Ok(registry)
    }

    pub fn register(&mut self, extractor: Box<dyn Extractor>) {
        self.extractors.push(extractor);
    }

    /// Remove an extractor by id. Returns whether one was removed.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.extractors.len();
        self.extractors.retain(|e| e.id() != id);
        self.extractors.len() != before
    }

    pub fn len(&self) -> usize {
        self.extractors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.extractors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn Extractor> {
        self.extractors.iter().map(|e| e.as_ref())
    }

    pub fn ids(&self) -> Vec<&str> {
        self.extractors.iter().map(|e| e.id()).collect()
    }
}

impl std::fmt::Debug for ExtractorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExtractorRegistry")
            .field("extractors", &self.ids())
            .finish()
    }
}

/// Group tag definitions by builder, keeping first-appearance order.
fn group_by_builder(defs: &[BuilderTagDef]) -> Vec<(&str, Vec<&BuilderTagDef>)> {
    let mut groups: Vec<(&str, Vec<&BuilderTagDef>)> = Vec::new();
    for def in defs {
        match groups.iter_mut().find(|(builder, _)| *builder == def.builder) {
            Some((_, group)) => {
                if !group.iter().any(|existing| existing.tag == def.tag) {
                    group.push(def);
                }
            }
            None => groups.push((def.builder.as_str(), vec![def])),
        }
    }
    groups
}
