//! Tests for individual extractors.

use formscan_analysis::extractors::*;
use formscan_core::config::DetectionConfig;
use formscan_core::errors::{ParseError, ScanError};
use formscan_core::types::{Document, FormReference, SourceKind};
use formscan_storage::InMemoryDocumentSource;
use serde_json::{json, Value};

fn page(body: &str) -> Document {
    Document::new(1, "Page", "page", body)
}

fn run(extractor: &dyn Extractor, document: &Document) -> Extraction {
    extractor
        .extract(&ExtractionContext::new(document, None, 512))
        .unwrap()
}

fn ids(extraction: &Extraction) -> Vec<u64> {
    extraction.references.iter().map(|r| r.form_id).collect()
}

// ── Elementor ────────────────────────────────────────────────────────────

#[test]
fn elementor_widget_in_nested_layout() {
    let data = json!([{
        "elType": "section",
        "elements": [{
            "elType": "column",
            "elements": [{
                "elType": "widget",
                "widgetType": "gravityforms",
                "settings": {"form_id": "3"}
            }]
        }]
    }]);
    let doc = page("").with_metadata("_elementor_data", data);
    let extraction = run(&ElementorExtractor::new(), &doc);
    assert_eq!(extraction.references, vec![FormReference::builder(3, "elementor")]);
    assert!(!extraction.fallback_requested);
}

#[test]
fn elementor_accepts_serialized_text_and_aliases() {
    let text = r#"[{"elType":"widget","widgetType":"gform-addon-widget","settings":{"gravity_form":7}}]"#;
    let doc = page("").with_metadata("_elementor_data", Value::String(text.to_string()));
    assert_eq!(ids(&run(&ElementorExtractor::new(), &doc)), vec![7]);
}

#[test]
fn elementor_deep_layout_same_as_text_or_tree() {
    let mut tree = json!({
        "elType": "widget",
        "widgetType": "gravityforms",
        "settings": {"gravity_form": "42"}
    });
    for _ in 0..70 {
        tree = json!({"elType": "section", "elements": [tree]});
    }
    let as_text = Value::String(tree.to_string());

    let from_tree = run(&ElementorExtractor::new(), &page("").with_metadata("_elementor_data", tree));
    let from_text = run(&ElementorExtractor::new(), &page("").with_metadata("_elementor_data", as_text));
    assert_eq!(ids(&from_tree), vec![42]);
    assert_eq!(from_text, from_tree);
}

#[test]
fn elementor_unrelated_widget_is_not_a_match() {
    let data = json!({"widgetType": "unrelated-widget", "settings": {"form_id": 9}});
    let doc = page("").with_metadata("_elementor_data", data);
    let extraction = run(&ElementorExtractor::new(), &doc);
    assert!(extraction.references.is_empty());
    assert!(extraction.fallback_requested);
}

#[test]
fn elementor_configured_key_alias() {
    let config = DetectionConfig {
        elementor_form_keys: vec!["gf_form".to_string()],
        ..Default::default()
    };
    let data = json!([{"widgetType": "gravityforms", "settings": {"gf_form": "12"}}]);
    let doc = page("").with_metadata("_elementor_data", data);
    assert_eq!(ids(&run(&ElementorExtractor::from_config(&config), &doc)), vec![12]);
}

#[test]
fn elementor_metadata_from_source() {
    let mut source = InMemoryDocumentSource::new();
    source.set_metadata(
        1,
        "_elementor_data",
        Value::String(r#"[{"widgetType":"gravityforms","settings":{"form_id":4}}]"#.to_string()),
    );
    let doc = page("");
    let ctx = ExtractionContext::new(&doc, Some(&source), 512);
    let extraction = ElementorExtractor::new().extract(&ctx).unwrap();
    assert_eq!(ids(&extraction), vec![4]);
}

#[test]
fn elementor_malformed_metadata_is_a_parse_error() {
    let doc = page("").with_metadata("_elementor_data", Value::String("{broken".to_string()));
    let err = ElementorExtractor::new()
        .extract(&ExtractionContext::new(&doc, None, 512))
        .unwrap_err();
    assert!(matches!(err, ScanError::Parse(ParseError::InvalidJson { .. })));
}

#[test]
fn elementor_absent_metadata_is_silent() {
    let extraction = run(&ElementorExtractor::new(), &page("[gravityform id=1]"));
    assert_eq!(extraction, Extraction::default());
}

// ── Beaver Builder ───────────────────────────────────────────────────────

#[test]
fn beaver_nested_settings() {
    let data = json!({
        "a1": {"node": "a1", "type": "row", "settings": {}},
        "b2": {"node": "b2", "type": "module", "parent": "a1",
               "settings": {"type": "gravity-form", "select_form": "6"}}
    });
    let doc = page("").with_metadata("_fl_builder_data", data);
    let extraction = run(&BeaverExtractor::new(), &doc);
    assert_eq!(extraction.references, vec![FormReference::builder(6, "beaver-builder")]);
}

#[test]
fn beaver_flat_settings_keys() {
    let data = json!([
        {"node": "x", "type": "module", "module": "gform-module", "settings.form_id": 10},
        {"node": "y", "type": "module", "settings[type]": "gravity-form", "settings[gform_id]": "11"}
    ]);
    let doc = page("").with_metadata("_fl_builder_data", data);
    assert_eq!(ids(&run(&BeaverExtractor::new(), &doc)), vec![10, 11]);
}

#[test]
fn beaver_settings_as_serialized_string() {
    let settings = r#"{"type":"gravity-form","form_id":"15"}"#;
    let data = json!({"z": {"node": "z", "type": "module", "settings": settings}});
    let doc = page("").with_metadata("_fl_builder_data", data);
    assert_eq!(ids(&run(&BeaverExtractor::new(), &doc)), vec![15]);
}

#[test]
fn beaver_php_serialized_metadata() {
    let text = r#"a:1:{s:1:"m";O:8:"stdClass":3:{s:4:"node";s:1:"m";s:4:"type";s:6:"module";s:8:"settings";O:8:"stdClass":2:{s:4:"type";s:12:"gravity-form";s:7:"form_id";s:1:"8";}}}"#;
    let doc = page("").with_metadata("_fl_builder_data", Value::String(text.to_string()));
    assert_eq!(ids(&run(&BeaverExtractor::new(), &doc)), vec![8]);
}

#[test]
fn beaver_non_form_module_requests_fallback() {
    let data = json!({"q": {"node": "q", "type": "module", "settings": {"type": "rich-text", "form_id": 3}}});
    let doc = page("").with_metadata("_fl_builder_data", data);
    let extraction = run(&BeaverExtractor::new(), &doc);
    assert!(extraction.references.is_empty());
    assert!(extraction.fallback_requested);
}

#[test]
fn beaver_scalar_metadata_is_unexpected_shape() {
    let doc = page("").with_metadata("_fl_builder_data", json!(5));
    let err = BeaverExtractor::new()
        .extract(&ExtractionContext::new(&doc, None, 512))
        .unwrap_err();
    assert!(matches!(err, ScanError::Parse(ParseError::UnexpectedShape { .. })));
}

// ── Body extractors ──────────────────────────────────────────────────────

#[test]
fn block_extractor_reads_metadata_text() {
    let doc = page("").with_metadata("_block_config", Value::String(r#"{"formId": "5"}"#.to_string()));
    let extraction = run(&BlockExtractor, &doc);
    assert_eq!(extraction.references, vec![FormReference::block(5)]);
}

#[test]
fn block_extractor_reads_pre_decoded_metadata() {
    let decoded = page("").with_metadata("_block_config", json!({"formId": 5}));
    let text = page("").with_metadata("_block_config", Value::String(r#"{"formId": 5}"#.to_string()));
    assert_eq!(run(&BlockExtractor, &decoded).references, vec![FormReference::block(5)]);
    assert_eq!(run(&BlockExtractor, &decoded), run(&BlockExtractor, &text));
}

#[test]
fn addon_extractor_reads_pre_decoded_metadata() {
    let doc = page("").with_metadata("_module_config", json!({"type": "module", "form_id": 7}));
    let extraction = run(&AddonExtractor::new(formscan_analysis::patterns::AddonHeuristic::new(200)), &doc);
    assert_eq!(extraction.references, vec![FormReference::addon(7)]);
}

#[test]
fn login_extractor_flags_only() {
    let extraction = run(&LoginExtractor, &page(r#"[gravityform action="login"]"#));
    assert!(extraction.login_form);
    assert!(extraction.references.is_empty());
}

#[test]
fn addon_extractor_tags_references() {
    let doc = page(r#"<div data-settings='{"widgetType":"gravity-addon","form_id":"19"}'></div>"#);
    let extraction = run(&AddonExtractor::new(formscan_analysis::patterns::AddonHeuristic::new(200)), &doc);
    assert_eq!(extraction.references.len(), 1);
    assert_eq!(extraction.references[0].source, SourceKind::AddonPattern);
}

#[test]
fn registry_runs_custom_extractors() {
    struct Fixed;
    impl Extractor for Fixed {
        fn id(&self) -> &str { "fixed" }
        fn category(&self) -> formscan_core::types::Category { formscan_core::types::Category::Block }
        fn extract(&self, _ctx: &ExtractionContext<'_>) -> Result<Extraction, ScanError> {
            Ok(Extraction::from_references([FormReference::block(99)]))
        }
    }

    let mut registry = ExtractorRegistry::new();
    registry.register(Box::new(Fixed));
    assert_eq!(registry.ids(), vec!["fixed"]);
    assert!(registry.remove("fixed"));
    assert!(registry.is_empty());
}
