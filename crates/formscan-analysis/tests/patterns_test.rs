//! Tests for the pattern library.

use formscan_analysis::patterns::*;
use formscan_core::config::BuilderTagDef;

#[test]
fn several_tags_in_one_body() {
    let body = r#"<p>Intro</p>[gravityform id="1" title="false"]
<p>More</p>[gravityform id=2 ajax=true][gravityform title="x" id='1']"#;
    assert_eq!(shortcode_form_ids(body).as_slice(), &[1, 2, 1]);
}

#[test]
fn unrelated_shortcodes_are_ignored() {
    assert!(shortcode_form_ids(r#"[contact-form-7 id="12"]"#).is_empty());
    assert!(shortcode_form_ids(r#"[gallery ids="1,2,3"]"#).is_empty());
}

#[test]
fn login_tag_has_no_id() {
    let body = r#"[gravityform action="login" login_redirect="/account"]"#;
    assert!(has_login_form(body));
    assert!(shortcode_form_ids(body).is_empty());
}

#[test]
fn block_comment_delimiters() {
    let body = r#"<!-- wp:gravityforms/form {"formId":"14","title":false,"description":false} /-->"#;
    assert_eq!(block_form_ids(body).as_slice(), &[14]);
}

#[test]
fn default_builder_tags_match_their_builders() {
    let patterns: Vec<BuilderTagPattern> = default_builder_tags()
        .iter()
        .map(|def| BuilderTagPattern::compile(def).unwrap())
        .collect();
    let body = r#"[et_pb_gravity_form form_id="21"][vc_gravityform id="22"][fusion_gravityform form_id="23" /]"#;

    let found: Vec<(String, u64)> = patterns
        .iter()
        .flat_map(|p| {
            p.form_ids(body)
                .into_iter()
                .map(move |id| (p.builder().to_string(), id))
        })
        .collect();
    assert_eq!(
        found,
        vec![
            ("divi".to_string(), 21),
            ("wpbakery".to_string(), 22),
            ("avada".to_string(), 23),
        ]
    );
}

#[test]
fn configured_tag_without_attributes_uses_defaults() {
    let pattern = BuilderTagPattern::compile(&BuilderTagDef::new("cornerstone", "cs_gravityform", &[])).unwrap();
    assert_eq!(pattern.form_ids(r#"[cs_gravityform form_id="5"]"#).as_slice(), &[5]);
    assert_eq!(pattern.form_ids(r#"[cs_gravityform id="6"]"#).as_slice(), &[6]);
}

#[test]
fn addon_heuristic_custom_markers() {
    let heuristic = AddonHeuristic::with_markers(100, &["wpforms".to_string()]);
    assert_eq!(
        heuristic.form_ids(r#"{"module":"wpforms-embed","form_id":"31"}"#).as_slice(),
        &[31]
    );
}

#[test]
fn rendered_fingerprints_dedupe() {
    let html = r#"<div class="gform_wrapper" id="gform_wrapper_2"><form id="gform_2">
<ul class="gform_fields gform_fields_2"></ul><input type="hidden" name="gform_submit" value="2"></form></div>"#;
    assert_eq!(rendered_form_ids(html).as_slice(), &[2]);
}

#[test]
fn prefilter_is_case_insensitive() {
    assert!(may_reference_forms("[GRAVITYFORM ID=1]"));
    assert!(may_reference_forms(r#"{"FORMID":1}"#));
    assert!(!may_reference_forms("[contact id=1]"));
}
