//! Scan configuration.

use serde::{Deserialize, Serialize};

use crate::types::ContentVariant;

/// Configuration for the corpus and document scanners.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ScanConfig {
    /// Worker threads for document scans. Default: 1 (sequential).
    pub threads: Option<usize>,
    /// Depth ceiling for metadata decoding and tree walks. Default: 512.
    pub max_depth: Option<usize>,
    /// Precedence of content variants for the rendered-content fallback.
    /// Default: body, raw, filtered, rendered.
    #[serde(default)]
    pub fallback_order: Vec<ContentVariant>,
    /// Enable the rendered-content fallback. Default: true.
    pub rendered_fallback: Option<bool>,
}

impl ScanConfig {
    pub const DEFAULT_MAX_DEPTH: usize = 512;

    /// Returns the effective thread count, defaulting to 1.
    pub fn effective_threads(&self) -> usize {
        self.threads.unwrap_or(1)
    }

    /// Returns the effective depth ceiling, defaulting to 512.
    pub fn effective_max_depth(&self) -> usize {
        self.max_depth.unwrap_or(Self::DEFAULT_MAX_DEPTH)
    }

    /// Returns the effective fallback precedence.
    pub fn effective_fallback_order(&self) -> Vec<ContentVariant> {
        if self.fallback_order.is_empty() {
            ContentVariant::DEFAULT_ORDER.to_vec()
        } else {
            self.fallback_order.clone()
        }
    }

    /// Returns whether the rendered-content fallback runs, defaulting to true.
    pub fn effective_rendered_fallback(&self) -> bool {
        self.rendered_fallback.unwrap_or(true)
    }
}
