//! Extractor system: one implementation per embedding convention.
//!
//! Each extractor implements the `Extractor` trait and is registered in the
//! `ExtractorRegistry`. The document scanner iterates the registry; adding a
//! builder means registering another extractor.

pub mod addon;
pub mod beaver;
pub mod block;
pub mod builder_tags;
pub mod elementor;
pub mod login;
pub mod registry;
pub mod shortcode;
pub mod traits;

pub use addon::AddonExtractor;
pub use beaver::BeaverExtractor;
pub use block::BlockExtractor;
pub use builder_tags::BuilderTagExtractor;
pub use elementor::ElementorExtractor;
pub use login::LoginExtractor;
pub use registry::ExtractorRegistry;
pub use shortcode::ShortcodeExtractor;
pub use traits::{Extraction, ExtractionContext, Extractor};

use formscan_core::config::DetectionConfig;

use crate::patterns::addon::DEFAULT_VENDOR_MARKERS;

/// Lowercased vendor markers: the built-in ones plus configured extras.
pub(crate) fn vendor_markers(config: &DetectionConfig) -> Vec<String> {
    DEFAULT_VENDOR_MARKERS
        .iter()
        .map(|m| m.to_string())
        .chain(config.vendor_markers.iter().map(|m| m.trim().to_ascii_lowercase()))
        .filter(|m| !m.is_empty())
        .collect()
}

/// Case-insensitive substring test against any marker.
pub(crate) fn contains_marker(text: &str, markers: &[String]) -> bool {
    let lower = text.to_ascii_lowercase();
    markers.iter().any(|m| lower.contains(m.as_str()))
}

/// Built-in settings keys plus configured aliases, without duplicates.
pub(crate) fn merge_keys(defaults: &[&str], extra: &[String]) -> Vec<String> {
    let mut keys: Vec<String> = defaults.iter().map(|k| k.to_string()).collect();
    for key in extra {
        if !key.is_empty() && !keys.contains(key) {
            keys.push(key.clone());
        }
    }
    keys
}
