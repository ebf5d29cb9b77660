//! End-to-end tests for the document and corpus scanners.

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use formscan_analysis::extractors::{Extraction, ExtractionContext, Extractor, ExtractorRegistry};
use formscan_analysis::{CorpusScanner, DocumentScanner};
use formscan_core::config::{DetectionConfig, FormscanConfig, ScanConfig};
use formscan_core::errors::{RenderError, RetrievalError, ScanError};
use formscan_core::traits::DocumentSource;
use formscan_core::events::*;
use formscan_core::types::{Category, ContentVariant, Document, ScanStatus};
use formscan_storage::InMemoryDocumentSource;
use serde_json::{json, Value};

fn set(ids: &[u64]) -> BTreeSet<u64> {
    ids.iter().copied().collect()
}

fn default_scanner() -> DocumentScanner {
    DocumentScanner::from_config(&FormscanConfig::default()).unwrap()
}

#[derive(Default)]
struct Recorder {
    scanned: Mutex<Vec<u64>>,
    failures: Mutex<Vec<ExtractionFailedEvent>>,
    completed: Mutex<Vec<ScanCompleteEvent>>,
    failed: Mutex<Vec<ScanFailedEvent>>,
}

impl ScanEventHandler for Recorder {
    fn on_document_scanned(&self, event: &DocumentScannedEvent) {
        self.scanned.lock().unwrap().push(event.document_id);
    }

    fn on_extraction_failed(&self, event: &ExtractionFailedEvent) {
        self.failures.lock().unwrap().push(event.clone());
    }

    fn on_scan_complete(&self, event: &ScanCompleteEvent) {
        self.completed.lock().unwrap().push(event.clone());
    }

    fn on_scan_failed(&self, event: &ScanFailedEvent) {
        self.failed.lock().unwrap().push(event.clone());
    }
}

fn recording() -> (Arc<Recorder>, EventDispatcher) {
    let recorder = Arc::new(Recorder::default());
    let mut events = EventDispatcher::new();
    events.register(recorder.clone());
    (recorder, events)
}

#[test]
fn three_document_corpus() {
    let source = InMemoryDocumentSource::from_documents([
        Document::new(1, "Contact", "page", r#"[gravityform id="3"]"#),
        Document::new(2, "Signup", "page", "")
            .with_metadata("_block_config", Value::String(r#"{"formId": "5"}"#.to_string())),
        Document::new(3, "Account", "page", r#"[gravityform action="login"]"#),
    ]);

    let summary = CorpusScanner::new(source, default_scanner()).scan().unwrap();
    assert_eq!(summary.total_documents_scanned, 3);
    assert_eq!(summary.matches.len(), 3);

    let doc1 = &summary.matches[0];
    assert_eq!(doc1.document.id, 1);
    assert_eq!(doc1.shortcode_form_ids, set(&[3]));
    assert!(doc1.block_form_ids.is_empty());

    let doc2 = &summary.matches[1];
    assert_eq!(doc2.block_form_ids, set(&[5]));

    let doc3 = &summary.matches[2];
    assert!(doc3.has_login_form);
    assert!(doc3.shortcode_form_ids.is_empty());
    assert!(doc3.block_form_ids.is_empty());
    assert!(doc3.builder_form_ids.is_empty());

    assert_eq!(summary.distinct_form_ids(), set(&[3, 5]));
}

#[test]
fn documents_without_references_are_excluded() {
    let source = InMemoryDocumentSource::from_documents([
        Document::new(1, "About", "page", "<p>Nothing here</p>"),
        Document::new(2, "Contact", "page", "[gravityform id=4]"),
        Document::new(3, "Blog", "post", r#"[contact-form-7 id="9"]"#),
    ]);
    let summary = CorpusScanner::new(source, default_scanner()).scan().unwrap();
    assert_eq!(summary.total_documents_scanned, 3);
    let ids: Vec<u64> = summary.matches.iter().map(|m| m.document.id).collect();
    assert_eq!(ids, vec![2]);
}

#[test]
fn same_id_from_two_matchers_is_reported_once() {
    let body = r#"[gravityform id="7"] <!-- wp:gravityforms/form {"formId":"7"} /--> [gravityform id='7']"#;
    let result = default_scanner().scan(&Document::new(1, "t", "page", body), None);
    assert_eq!(result.shortcode_form_ids, set(&[7]));
    assert_eq!(result.block_form_ids, set(&[7]));
    assert_eq!(result.diagnostics.extractor_hits["shortcode"], 2);
}

#[test]
fn builder_and_addon_ids_share_a_category() {
    let body = r#"[et_pb_gravityform form_id="2"]<script>{"type":"module","form_id":"2"}</script>"#;
    let result = default_scanner().scan(&Document::new(1, "t", "page", body), None);
    assert_eq!(result.builder_form_ids, set(&[2]));
    assert_eq!(result.diagnostics.extractor_hits["divi-shortcode"], 1);
    assert_eq!(result.diagnostics.extractor_hits["addon-heuristic"], 1);
}

/// Counts every read of a body variant the fallback could consult.
#[derive(Default)]
struct CountingSource {
    inner: InMemoryDocumentSource,
    variant_reads: AtomicUsize,
}

impl DocumentSource for CountingSource {
    fn fetch_scannable(&self) -> Result<Vec<Document>, RetrievalError> {
        self.inner.fetch_scannable()
    }

    fn metadata(&self, document_id: u64, key: &str) -> Option<Value> {
        self.inner.metadata(document_id, key)
    }

    fn raw_content(&self, document_id: u64) -> Option<String> {
        self.variant_reads.fetch_add(1, Ordering::SeqCst);
        self.inner.raw_content(document_id)
    }

    fn filtered_content(&self, document_id: u64) -> Option<String> {
        self.variant_reads.fetch_add(1, Ordering::SeqCst);
        self.inner.filtered_content(document_id)
    }

    fn render_content(&self, document_id: u64) -> Result<String, RenderError> {
        self.variant_reads.fetch_add(1, Ordering::SeqCst);
        self.inner.render_content(document_id)
    }
}

#[test]
fn structured_hit_short_circuits_fallback() {
    let mut source = CountingSource::default();
    source.inner.set_raw(1, r#"<form id="gform_5"></form>"#);
    source.inner.set_rendered(1, r#"<div id="gform_wrapper_9"></div>"#);
    let doc = Document::new(1, "t", "page", "").with_metadata(
        "_elementor_data",
        json!([{"widgetType": "gravityforms", "settings": {"form_id": "7"}}]),
    );

    let result = default_scanner().scan(&doc, Some(&source));
    assert_eq!(result.builder_form_ids, set(&[7]));
    assert_eq!(result.diagnostics.fallback_source, None);
    assert!(!result.diagnostics.extractor_hits.contains_key("rendered-fallback"));
    assert_eq!(source.variant_reads.load(Ordering::SeqCst), 0);
}

#[test]
fn fallback_stops_at_first_variant_with_a_hit() {
    let mut source = CountingSource::default();
    source.inner.set_raw(1, r#"<form id="gform_5"></form>"#);
    source.inner.set_rendered(1, r#"<div id="gform_wrapper_9"></div>"#);
    let doc = Document::new(1, "t", "page", "")
        .with_metadata("_elementor_data", json!([{"widgetType": "gravityforms"}]));

    let result = default_scanner().scan(&doc, Some(&source));
    assert_eq!(result.builder_form_ids, set(&[5]));
    // body is on the document; only the raw variant is fetched
    assert_eq!(source.variant_reads.load(Ordering::SeqCst), 1);
}

#[test]
fn empty_structured_data_falls_back_to_first_non_empty_variant() {
    let mut source = InMemoryDocumentSource::new();
    source.set_raw(1, r#"<form id="gform_9"></form>"#);
    source.set_rendered(1, r#"<form id="gform_11"></form>"#);
    let doc = Document::new(1, "t", "page", "")
        .with_metadata("_elementor_data", json!([{"widgetType": "gravityforms", "settings": []}]));

    let result = default_scanner().scan(&doc, Some(&source));
    assert_eq!(result.builder_form_ids, set(&[9]));
    assert_eq!(result.diagnostics.fallback_source, Some(ContentVariant::Raw));
    assert!(result.has_findings());
}

#[test]
fn fallback_order_is_configurable() {
    let mut source = InMemoryDocumentSource::new();
    source.set_raw(1, r#"<form id="gform_9"></form>"#);
    source.set_rendered(1, r#"<form id="gform_11"></form>"#);
    let doc = Document::new(1, "t", "page", "")
        .with_metadata("_elementor_data", json!([{"widgetType": "gravityforms"}]));

    let config = ScanConfig {
        fallback_order: vec![ContentVariant::Rendered, ContentVariant::Raw],
        ..Default::default()
    };
    let registry = ExtractorRegistry::with_defaults(&DetectionConfig::default()).unwrap();
    let scanner = DocumentScanner::new(registry, &config);

    let result = scanner.scan(&doc, Some(&source));
    assert_eq!(result.builder_form_ids, set(&[11]));
    assert_eq!(result.diagnostics.fallback_source, Some(ContentVariant::Rendered));
}

#[test]
fn disabled_fallback_never_reads_variants() {
    let mut source = InMemoryDocumentSource::new();
    source.set_raw(1, r#"<form id="gform_9"></form>"#);
    let doc = Document::new(1, "t", "page", "")
        .with_metadata("_elementor_data", json!([{"widgetType": "gravityforms"}]));

    let config = ScanConfig {
        rendered_fallback: Some(false),
        ..Default::default()
    };
    let registry = ExtractorRegistry::with_defaults(&DetectionConfig::default()).unwrap();
    let result = DocumentScanner::new(registry, &config).scan(&doc, Some(&source));
    assert!(result.builder_form_ids.is_empty());
    assert!(!result.has_findings());
}

#[test]
fn render_failure_is_reported_not_fatal() {
    let (recorder, events) = recording();
    let mut source = InMemoryDocumentSource::new();
    source.set_render_failure(1, "template error");
    let doc = Document::new(1, "t", "page", "[gravityform id=2]")
        .with_metadata("_elementor_data", json!([{"widgetType": "gravityforms"}]));

    let result = default_scanner().with_events(events).scan(&doc, Some(&source));
    assert_eq!(result.shortcode_form_ids, set(&[2]));
    assert_eq!(result.diagnostics.failed_extractors, vec!["rendered-fallback".to_string()]);

    let failures = recorder.failures.lock().unwrap();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].error_code, "RENDER_ERROR");
}

#[test]
fn malformed_metadata_does_not_affect_the_next_document() {
    let (recorder, events) = recording();
    let source = InMemoryDocumentSource::from_documents([
        Document::new(1, "Broken", "page", "")
            .with_metadata("_elementor_data", Value::String("{not json".to_string())),
        Document::new(2, "Fine", "page", r#"[gravityform id="8"]"#),
    ]);

    let summary = CorpusScanner::new(source, default_scanner())
        .with_events(events)
        .scan()
        .unwrap();
    assert_eq!(summary.total_documents_scanned, 2);
    assert_eq!(summary.matches.len(), 1);
    assert_eq!(summary.matches[0].shortcode_form_ids, set(&[8]));

    let failures = recorder.failures.lock().unwrap();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].document_id, 1);
    assert_eq!(failures[0].extractor_id, "elementor");
    assert_eq!(failures[0].error_code, "PARSE_ERROR");
    assert_eq!(*recorder.scanned.lock().unwrap(), vec![1, 2]);
}

struct Panicking;

impl Extractor for Panicking {
    fn id(&self) -> &str { "panicking" }
    fn category(&self) -> Category { Category::Builder }

    fn extract(&self, _ctx: &ExtractionContext<'_>) -> Result<Extraction, ScanError> {
        panic!("extractor bug");
    }
}

#[test]
fn panicking_extractor_is_contained() {
    let mut registry = ExtractorRegistry::with_defaults(&DetectionConfig::default()).unwrap();
    registry.register(Box::new(Panicking));
    let scanner = DocumentScanner::new(registry, &ScanConfig::default());

    let result = scanner.scan(&Document::new(1, "t", "page", "[gravityform id=1]"), None);
    assert_eq!(result.shortcode_form_ids, set(&[1]));
    assert_eq!(result.diagnostics.failed_extractors, vec!["panicking".to_string()]);
}

#[test]
fn retrieval_failure_fails_the_scan() {
    let (recorder, events) = recording();
    let mut source = InMemoryDocumentSource::new();
    source.insert(Document::new(1, "t", "page", "[gravityform id=1]"));
    source.set_unavailable("database offline");

    let scanner = CorpusScanner::new(source, default_scanner()).with_events(events);
    assert!(matches!(scanner.scan(), Err(ScanError::Retrieval(_))));

    let outcome = scanner.run();
    assert!(outcome.status.is_failed());
    assert!(outcome.summary.matches.is_empty());
    match &outcome.status {
        ScanStatus::Failed { error_code, .. } => assert_eq!(error_code, "SOURCE_UNAVAILABLE"),
        other => panic!("unexpected status: {other:?}"),
    }
    assert!(recorder.scanned.lock().unwrap().is_empty());
    assert_eq!(recorder.failed.lock().unwrap().len(), 2);
}

#[test]
fn empty_corpus_reports_nothing_scanned() {
    let outcome = CorpusScanner::new(InMemoryDocumentSource::new(), default_scanner()).run();
    assert_eq!(outcome.status, ScanStatus::NothingScanned);
}

#[test]
fn drafts_are_not_scanned() {
    let mut source = InMemoryDocumentSource::new();
    source.insert_with_status(Document::new(1, "t", "page", "[gravityform id=1]"), "draft");
    source.insert(Document::new(2, "t", "page", "[gravityform id=2]"));

    let outcome = CorpusScanner::new(source, default_scanner()).run();
    assert_eq!(outcome.summary.total_documents_scanned, 1);
    assert_eq!(outcome.status, ScanStatus::Complete { documents_with_forms: 1 });
}

#[test]
fn parallel_scan_preserves_corpus_order() {
    let documents: Vec<Document> = (1..=40)
        .map(|i| {
            let body = if i % 3 == 0 {
                String::from("<p>plain</p>")
            } else {
                format!("[gravityform id=\"{i}\"]")
            };
            Document::new(i, format!("Doc {i}"), "page", body)
        })
        .collect();

    let sequential = CorpusScanner::new(
        InMemoryDocumentSource::from_documents(documents.clone()),
        default_scanner(),
    )
    .scan()
    .unwrap();

    let (recorder, events) = recording();
    let parallel = CorpusScanner::new(InMemoryDocumentSource::from_documents(documents), default_scanner())
        .with_threads(4)
        .with_events(events)
        .scan()
        .unwrap();

    assert_eq!(sequential, parallel);
    assert_eq!(parallel.matched_count(), 27);
    assert_eq!(recorder.scanned.lock().unwrap().len(), 40);
    assert_eq!(recorder.completed.lock().unwrap()[0].documents_matched, 27);
}
