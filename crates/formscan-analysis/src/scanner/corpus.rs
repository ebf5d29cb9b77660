//! CorpusScanner: fetch, scan each document, keep the ones with findings.

use std::time::Instant;

use formscan_core::config::FormscanConfig;
use formscan_core::errors::{FormscanErrorCode, PatternError, ScanError};
use formscan_core::events::{EventDispatcher, ScanCompleteEvent, ScanFailedEvent, ScanStartedEvent};
use formscan_core::traits::DocumentSource;
use formscan_core::types::{Document, DocumentScanResult, ScanOutcome, ScanSummary};
use rayon::prelude::*;

use super::document::DocumentScanner;

/// Drives a full scan over a document source.
///
/// Only a failed corpus fetch is fatal. With `threads > 1` documents are
/// scanned on a bounded rayon pool; results keep corpus order either way.
#[derive(Debug)]
pub struct CorpusScanner<S: DocumentSource> {
    source: S,
    scanner: DocumentScanner,
    threads: usize,
}

impl<S: DocumentSource> CorpusScanner<S> {
    pub fn new(source: S, scanner: DocumentScanner) -> Self {
        Self {
            source,
            scanner,
            threads: 1,
        }
    }

    /// Scanner with the default registry and the thread count from `config`.
    pub fn from_config(source: S, config: &FormscanConfig) -> Result<Self, PatternError> {
        let scanner = DocumentScanner::from_config(config)?;
        Ok(Self::new(source, scanner).with_threads(config.scan.effective_threads()))
    }

    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads.max(1);
        self
    }

    pub fn with_events(mut self, events: EventDispatcher) -> Self {
        self.scanner = self.scanner.with_events(events);
        self
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn scanner(&self) -> &DocumentScanner {
        &self.scanner
    }

    /// Scan the corpus. Fails only if the source cannot be queried.
    pub fn scan(&self) -> Result<ScanSummary, ScanError> {
        let start = Instant::now();
        let events = self.scanner.events();

        let documents = match self.source.fetch_scannable() {
            Ok(documents) => documents,
            Err(e) => {
                let err = ScanError::from(e);
                tracing::error!(error = %err, "document fetch failed; scan aborted");
                events.emit_scan_failed(&ScanFailedEvent {
                    message: err.to_string(),
                    error_code: err.error_code().to_string(),
                });
                return Err(err);
            }
        };

        events.emit_scan_started(&ScanStartedEvent {
            total_documents: documents.len(),
            extractor_count: self.scanner.registry().len(),
        });
        tracing::info!(
            documents = documents.len(),
            threads = self.threads,
            "scan started"
        );

        let results = if self.threads > 1 && documents.len() > 1 {
            self.scan_parallel(&documents)
        } else {
            self.scan_sequential(&documents)
        };

        let summary = ScanSummary {
            total_documents_scanned: documents.len(),
            matches: results.into_iter().filter(|r| r.has_findings()).collect(),
        };

        let duration_ms = start.elapsed().as_millis() as u64;
        events.emit_scan_complete(&ScanCompleteEvent {
            documents_scanned: summary.total_documents_scanned,
            documents_matched: summary.matched_count(),
            duration_ms,
        });
        tracing::info!(
            scanned = summary.total_documents_scanned,
            matched = summary.matched_count(),
            duration_ms,
            "scan complete"
        );

        Ok(summary)
    }

    /// Scan without failing: a fetch failure becomes a `Failed` status with
    /// an empty summary.
    pub fn run(&self) -> ScanOutcome {
        match self.scan() {
            Ok(summary) => ScanOutcome::from_summary(summary),
            Err(e) => ScanOutcome::failed(e.to_string(), e.error_code()),
        }
    }

    fn scan_sequential(&self, documents: &[Document]) -> Vec<DocumentScanResult> {
        let source: &dyn DocumentSource = &self.source;
        documents
            .iter()
            .map(|document| self.scanner.scan(document, Some(source)))
            .collect()
    }

    fn scan_parallel(&self, documents: &[Document]) -> Vec<DocumentScanResult> {
        let pool = match rayon::ThreadPoolBuilder::new()
            .num_threads(self.threads)
            .thread_name(|i| format!("formscan-scan-{i}"))
            .build()
        {
            Ok(pool) => pool,
            Err(e) => {
                tracing::warn!(error = %e, "could not build scan pool; scanning sequentially");
                return self.scan_sequential(documents);
            }
        };

        let source: &dyn DocumentSource = &self.source;
        pool.install(|| {
            documents
                .par_iter()
                .map(|document| self.scanner.scan(document, Some(source)))
                .collect()
        })
    }
}
