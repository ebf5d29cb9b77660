//! Event payload types.

use std::collections::BTreeMap;

use crate::types::ContentVariant;

/// Payload for `on_scan_started`.
#[derive(Debug, Clone)]
pub struct ScanStartedEvent {
    pub total_documents: usize,
    pub extractor_count: usize,
}

/// Payload for `on_document_scanned`. Emitted exactly once per document.
#[derive(Debug, Clone)]
pub struct DocumentScannedEvent {
    pub document_id: u64,
    /// References found per extractor id, before deduplication.
    pub extractor_hits: BTreeMap<String, usize>,
    pub fallback_source: Option<ContentVariant>,
    pub failures: usize,
    pub has_findings: bool,
}

/// Payload for `on_extraction_failed`. One per failing extractor per document.
#[derive(Debug, Clone)]
pub struct ExtractionFailedEvent {
    pub document_id: u64,
    pub extractor_id: String,
    pub error_code: String,
    pub message: String,
}

/// Payload for `on_scan_complete`.
#[derive(Debug, Clone)]
pub struct ScanCompleteEvent {
    pub documents_scanned: usize,
    pub documents_matched: usize,
    pub duration_ms: u64,
}

/// Payload for `on_scan_failed`.
#[derive(Debug, Clone)]
pub struct ScanFailedEvent {
    pub message: String,
    pub error_code: String,
}
