//! DocumentScanner: runs every registered extractor over one document.

use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};

use formscan_core::config::{FormscanConfig, ScanConfig};
use formscan_core::errors::error_code::FormscanErrorCode;
use formscan_core::errors::{PatternError, ScanError};
use formscan_core::events::types::{DocumentScannedEvent, ExtractionFailedEvent};
use formscan_core::events::EventDispatcher;
use formscan_core::traits::DocumentSource;
use formscan_core::types::{Category, Document, DocumentScanResult, FormReference};

use super::fallback::{RenderedFallback, FALLBACK_ID};
use crate::extractors::{ExtractionContext, ExtractorRegistry};

/// Scans one document at a time. Holds no per-document state, so one
/// scanner serves any number of documents, from any number of threads.
///
/// Extractor failures (errors and panics) are contained here: the failing
/// extractor contributes nothing, the failure is logged and reported once
/// as an `ExtractionFailedEvent`, and the remaining extractors still run.
#[derive(Debug)]
pub struct DocumentScanner {
    registry: ExtractorRegistry,
    fallback: RenderedFallback,
    max_depth: usize,
    events: EventDispatcher,
}

impl DocumentScanner {
    pub fn new(registry: ExtractorRegistry, config: &ScanConfig) -> Self {
        Self {
            registry,
            fallback: RenderedFallback::from_config(config),
            max_depth: config.effective_max_depth(),
            events: EventDispatcher::new(),
        }
    }

    /// Scanner with the default registry for `config`.
    pub fn from_config(config: &FormscanConfig) -> Result<Self, PatternError> {
        let registry = ExtractorRegistry::with_defaults(&config.detection)?;
        Ok(Self::new(registry, &config.scan))
    }

    pub fn with_events(mut self, events: EventDispatcher) -> Self {
        self.events = events;
        self
    }

    pub fn with_fallback(mut self, fallback: RenderedFallback) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn registry(&self) -> &ExtractorRegistry {
        &self.registry
    }

    pub fn events(&self) -> &EventDispatcher {
        &self.events
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn scan(&self, document: &Document, source: Option<&dyn DocumentSource>) -> DocumentScanResult {
        let ctx = ExtractionContext::new(document, source, self.max_depth);
        let mut result = DocumentScanResult::new(document.clone());
        let mut fallback_owner: Option<&str> = None;

        for extractor in self.registry.iter() {
            let id = extractor.id();
            let extracted = catch_unwind(AssertUnwindSafe(|| extractor.extract(&ctx)))
                .unwrap_or_else(|payload| {
                    Err(ScanError::ExtractorPanic {
                        extractor: id.to_string(),
                        message: panic_message(payload.as_ref()),
                    })
                });

            match extracted {
                Ok(extraction) => {
                    result
                        .diagnostics
                        .extractor_hits
                        .insert(id.to_string(), extraction.references.len());
                    for reference in &extraction.references {
                        result.add_reference(reference);
                    }
                    result.has_login_form |= extraction.login_form;
                    if extraction.fallback_requested && fallback_owner.is_none() {
                        fallback_owner = Some(id);
                    }
                }
                Err(err) => self.record_failure(&mut result, id, err.error_code(), &err.to_string()),
            }
        }

        // The fallback only fills an empty builder category; a builder id
        // found any other way short-circuits it.
        if let Some(owner) = fallback_owner {
            if result.ids(Category::Builder).is_empty() {
                self.apply_fallback(&mut result, owner, source);
            }
        }

        self.events.emit_document_scanned(&DocumentScannedEvent {
            document_id: document.id,
            extractor_hits: result.diagnostics.extractor_hits.clone(),
            fallback_source: result.diagnostics.fallback_source,
            failures: result.diagnostics.failed_extractors.len(),
            has_findings: result.has_findings(),
        });
        tracing::trace!(
            document_id = document.id,
            has_findings = result.has_findings(),
            "document scanned"
        );

        result
    }

    fn apply_fallback(
        &self,
        result: &mut DocumentScanResult,
        owner: &str,
        source: Option<&dyn DocumentSource>,
    ) {
        let outcome = self.fallback.run(&result.document, source);
        if let Some(err) = outcome.render_error {
            self.record_failure(result, FALLBACK_ID, err.error_code(), &err.to_string());
        }
        if let Some(variant) = outcome.source {
            tracing::debug!(
                document_id = result.document.id,
                builder = owner,
                variant = %variant,
                "rendered-content fallback hit"
            );
            result
                .diagnostics
                .extractor_hits
                .insert(FALLBACK_ID.to_string(), outcome.ids.len());
            result.diagnostics.fallback_source = Some(variant);
            for id in outcome.ids {
                result.add_reference(&FormReference::builder(id, owner));
            }
        }
    }

    fn record_failure(&self, result: &mut DocumentScanResult, extractor: &str, code: &str, message: &str) {
        tracing::warn!(
            document_id = result.document.id,
            extractor,
            error_code = code,
            error = message,
            "extractor failed; treating as no match"
        );
        result.diagnostics.failed_extractors.push(extractor.to_string());
        self.events.emit_extraction_failed(&ExtractionFailedEvent {
            document_id: result.document.id,
            extractor_id: extractor.to_string(),
            error_code: code.to_string(),
            message: message.to_string(),
        });
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
