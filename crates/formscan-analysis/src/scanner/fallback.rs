//! Rendered-content fallback.
//!
//! Structured builder data is sometimes stale, or the builder renders a form
//! without persisting its id. When that happens the content variants are
//! searched for rendered-HTML fingerprints, in a configured precedence; the
//! first variant with a hit wins and the rest are never read.

use std::borrow::Cow;

use formscan_core::config::ScanConfig;
use formscan_core::errors::RenderError;
use formscan_core::traits::DocumentSource;
use formscan_core::types::{ContentVariant, Document, FormId, SmallVec4};

use crate::patterns::rendered_form_ids;

/// Id under which fallback hits and failures are reported.
pub const FALLBACK_ID: &str = "rendered-fallback";

#[derive(Debug, Default)]
pub struct FallbackOutcome {
    /// Variant that produced the hit, if any.
    pub source: Option<ContentVariant>,
    pub ids: SmallVec4<FormId>,
    /// Variants consulted, in order.
    pub consulted: Vec<ContentVariant>,
    /// A rendering failure met along the way. Never fatal.
    pub render_error: Option<RenderError>,
}

#[derive(Debug, Clone)]
pub struct RenderedFallback {
    order: Vec<ContentVariant>,
    enabled: bool,
}

impl RenderedFallback {
    pub fn new(order: Vec<ContentVariant>, enabled: bool) -> Self {
        Self { order, enabled }
    }

    pub fn from_config(config: &ScanConfig) -> Self {
        Self::new(
            config.effective_fallback_order(),
            config.effective_rendered_fallback(),
        )
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn order(&self) -> &[ContentVariant] {
        &self.order
    }

    pub fn run(&self, document: &Document, source: Option<&dyn DocumentSource>) -> FallbackOutcome {
        let mut outcome = FallbackOutcome::default();
        if !self.enabled {
            return outcome;
        }

        for &variant in &self.order {
            outcome.consulted.push(variant);
            let Some(content) = self.content(variant, document, source, &mut outcome) else {
                continue;
            };
            let ids = rendered_form_ids(&content);
            if !ids.is_empty() {
                outcome.source = Some(variant);
                outcome.ids = ids;
                break;
            }
        }
        outcome
    }

    fn content<'d>(
        &self,
        variant: ContentVariant,
        document: &'d Document,
        source: Option<&dyn DocumentSource>,
        outcome: &mut FallbackOutcome,
    ) -> Option<Cow<'d, str>> {
        match variant {
            ContentVariant::Body => Some(Cow::Borrowed(document.body.as_str())),
            ContentVariant::Raw => source?.raw_content(document.id).map(Cow::Owned),
            ContentVariant::Filtered => source?.filtered_content(document.id).map(Cow::Owned),
            ContentVariant::Rendered => match source?.render_content(document.id) {
                Ok(html) => Some(Cow::Owned(html)),
                Err(RenderError::Unavailable { .. }) => {
                    tracing::debug!(document_id = document.id, "no renderer; skipping rendered variant");
                    None
                }
                Err(e) => {
                    outcome.render_error = Some(e);
                    None
                }
            },
        }
    }
}

impl Default for RenderedFallback {
    fn default() -> Self {
        Self::from_config(&ScanConfig::default())
    }
}
