//! Tests for the WordPress-schema document source.

use std::sync::Arc;

use formscan_analysis::CorpusScanner;
use formscan_core::config::FormscanConfig;
use formscan_core::errors::{RenderError, RetrievalError};
use formscan_core::traits::DocumentSource;
use formscan_core::types::Document;
use formscan_storage::schema::create_tables;
use formscan_storage::{ContentRenderer, InMemoryDocumentSource, SiteDatabase, WordPressSource};
use rusqlite::{params, Connection};
use serde_json::Value;

fn setup_db(prefix: &str) -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    create_tables(&conn, prefix).unwrap();
    conn
}

fn insert_post(conn: &Connection, id: i64, title: &str, status: &str, content: &str) {
    conn.execute(
        "INSERT INTO wp_posts (ID, post_title, post_type, post_status, post_content) VALUES (?1, ?2, 'page', ?3, ?4)",
        params![id, title, status, content],
    )
    .unwrap();
}

fn insert_meta(conn: &Connection, post_id: i64, key: &str, value: &str) {
    conn.execute(
        "INSERT INTO wp_postmeta (post_id, meta_key, meta_value) VALUES (?1, ?2, ?3)",
        params![post_id, key, value],
    )
    .unwrap();
}

fn source(conn: Connection) -> WordPressSource {
    WordPressSource::new(Arc::new(SiteDatabase::from_connection(conn, "wp_").unwrap()))
}

struct UpperRenderer;

impl ContentRenderer for UpperRenderer {
    fn render(&self, document_id: u64, content: &str) -> Result<String, RenderError> {
        if content.is_empty() {
            return Err(RenderError::Failed {
                document_id,
                message: "empty".to_string(),
            });
        }
        Ok(format!("<div id=\"gform_wrapper_{document_id}\">{content}</div>"))
    }
}

#[test]
fn fetches_published_posts_in_id_order() {
    let conn = setup_db("wp_");
    insert_post(&conn, 3, "Contact", "publish", "[gravityform id=\"3\"]");
    insert_post(&conn, 1, "About", "publish", "hello");
    insert_post(&conn, 2, "Draft", "draft", "[gravityform id=\"9\"]");

    let docs = source(conn).fetch_scannable().unwrap();
    let ids: Vec<u64> = docs.iter().map(|d| d.id).collect();
    assert_eq!(ids, vec![1, 3]);
    assert_eq!(docs[1].title, "Contact");
    assert_eq!(docs[1].kind, "page");
    assert_eq!(docs[1].body, "[gravityform id=\"3\"]");
}

#[test]
fn missing_tables_fail_retrieval() {
    let conn = Connection::open_in_memory().unwrap();
    let err = source(conn).fetch_scannable().unwrap_err();
    assert!(matches!(err, RetrievalError::QueryFailed { .. }));
}

#[test]
fn metadata_arrives_as_serialized_text() {
    let conn = setup_db("wp_");
    insert_post(&conn, 1, "Page", "publish", "");
    conn.execute(
        "INSERT INTO wp_postmeta (post_id, meta_key, meta_value) VALUES (1, '_elementor_data', ?1)",
        params![r#"[{"widgetType":"gravityforms"}]"#],
    )
    .unwrap();

    let source = source(conn);
    assert_eq!(
        source.metadata(1, "_elementor_data"),
        Some(Value::String(r#"[{"widgetType":"gravityforms"}]"#.to_string()))
    );
    assert_eq!(source.metadata(1, "_fl_builder_data"), None);
    assert_eq!(source.metadata(2, "_elementor_data"), None);
}

#[test]
fn published_postmeta_is_carried_on_documents() {
    let conn = setup_db("wp_");
    insert_post(&conn, 1, "Page", "publish", "");
    insert_post(&conn, 2, "Draft", "draft", "");
    insert_meta(&conn, 1, "_block_config", r#"{"formId": "5"}"#);
    insert_meta(&conn, 1, "_block_config", r#"{"formId": "6"}"#);
    insert_meta(&conn, 2, "_block_config", r#"{"formId": "9"}"#);

    let docs = source(conn).fetch_scannable().unwrap();
    assert_eq!(docs.len(), 1);
    assert_eq!(docs[0].metadata.len(), 1);
    assert_eq!(
        docs[0].meta("_block_config"),
        Some(&Value::String(r#"{"formId": "5"}"#.to_string()))
    );
}

#[test]
fn full_scan_matches_in_memory_source() {
    let conn = setup_db("wp_");
    insert_post(&conn, 1, "Contact", "publish", r#"[gravityform id="3"]"#);
    insert_post(&conn, 2, "Signup", "publish", "");
    insert_meta(&conn, 2, "_block_config", r#"{"formId": "5"}"#);
    insert_post(&conn, 3, "Account", "publish", r#"[gravityform action="login"]"#);
    insert_post(&conn, 4, "Landing", "publish", "");
    insert_meta(
        &conn,
        4,
        "_elementor_data",
        r#"[{"elType":"widget","widgetType":"gravityforms","settings":{"form_id":"8"}}]"#,
    );

    let config = FormscanConfig::default();
    let from_db = CorpusScanner::from_config(source(conn), &config)
        .unwrap()
        .scan()
        .unwrap();

    let memory = InMemoryDocumentSource::from_documents([
        Document::new(1, "Contact", "page", r#"[gravityform id="3"]"#),
        Document::new(2, "Signup", "page", "").with_metadata(
            "_block_config",
            Value::String(r#"{"formId": "5"}"#.to_string()),
        ),
        Document::new(3, "Account", "page", r#"[gravityform action="login"]"#),
        Document::new(4, "Landing", "page", "").with_metadata(
            "_elementor_data",
            Value::String(
                r#"[{"elType":"widget","widgetType":"gravityforms","settings":{"form_id":"8"}}]"#
                    .to_string(),
            ),
        ),
    ]);
    let from_memory = CorpusScanner::from_config(memory, &config)
        .unwrap()
        .scan()
        .unwrap();

    assert_eq!(from_db.total_documents_scanned, 4);
    assert_eq!(from_db.matches.len(), 4);
    let block: Vec<u64> = from_db.matches[1].block_form_ids.iter().copied().collect();
    assert_eq!(block, vec![5]);
    let builder: Vec<u64> = from_db.matches[3].builder_form_ids.iter().copied().collect();
    assert_eq!(builder, vec![8]);
    assert_eq!(from_db.distinct_form_ids(), from_memory.distinct_form_ids());
    for (db_row, memory_row) in from_db.matches.iter().zip(&from_memory.matches) {
        assert_eq!(db_row.document.id, memory_row.document.id);
        assert_eq!(db_row.shortcode_form_ids, memory_row.shortcode_form_ids);
        assert_eq!(db_row.block_form_ids, memory_row.block_form_ids);
        assert_eq!(db_row.builder_form_ids, memory_row.builder_form_ids);
        assert_eq!(db_row.has_login_form, memory_row.has_login_form);
    }
}

#[test]
fn content_variants() {
    let conn = setup_db("wp_");
    insert_post(&conn, 1, "Page", "publish", "raw body");
    conn.execute(
        "UPDATE wp_posts SET post_content_filtered = '<p>filtered</p>' WHERE ID = 1",
        [],
    )
    .unwrap();
    insert_post(&conn, 2, "Other", "publish", "");

    let source = source(conn);
    assert_eq!(source.raw_content(1).as_deref(), Some("raw body"));
    assert_eq!(source.filtered_content(1).as_deref(), Some("<p>filtered</p>"));
    assert_eq!(source.filtered_content(2), None);
    assert_eq!(source.raw_content(42), None);
}

#[test]
fn rendering_requires_a_renderer() {
    let conn = setup_db("wp_");
    insert_post(&conn, 1, "Page", "publish", "body");
    insert_post(&conn, 2, "Empty", "publish", "");

    let plain = source(conn);
    assert!(matches!(
        plain.render_content(1),
        Err(RenderError::Unavailable { document_id: 1 })
    ));

    let rendered = plain.with_renderer(Box::new(UpperRenderer));
    assert_eq!(
        rendered.render_content(1).unwrap(),
        "<div id=\"gform_wrapper_1\">body</div>"
    );
    assert!(matches!(
        rendered.render_content(2),
        Err(RenderError::Failed { .. })
    ));
}

#[test]
fn custom_prefix() {
    let conn = Connection::open_in_memory().unwrap();
    create_tables(&conn, "site7_").unwrap();
    conn.execute(
        "INSERT INTO site7_posts (ID, post_title, post_status, post_content) VALUES (5, 't', 'publish', '')",
        [],
    )
    .unwrap();

    let db = SiteDatabase::from_connection(conn, "site7_").unwrap();
    let docs = WordPressSource::new(Arc::new(db)).fetch_scannable().unwrap();
    assert_eq!(docs.len(), 1);
    assert_eq!(docs[0].id, 5);
}

#[test]
fn opens_file_database_read_only() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("site.db");
    {
        let conn = Connection::open(&path).unwrap();
        create_tables(&conn, "wp_").unwrap();
        insert_post(&conn, 1, "Contact", "publish", "[gravityform id=\"2\"]");
    }

    let db = SiteDatabase::open(&path, "wp_").unwrap();
    assert!(db.has_table("posts").unwrap());
    let docs = WordPressSource::new(Arc::new(db)).fetch_scannable().unwrap();
    assert_eq!(docs.len(), 1);
}

#[test]
fn missing_database_file_is_unavailable() {
    let dir = tempfile::TempDir::new().unwrap();
    let err = SiteDatabase::open(&dir.path().join("absent.db"), "wp_").unwrap_err();
    assert!(matches!(err, RetrievalError::Unavailable { .. }));
}
