//! Per-document findings, corpus summaries, and scan outcomes.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::content::ContentVariant;
use super::document::Document;
use super::reference::{Category, FormId, FormReference};

/// Per-document bookkeeping carried alongside the findings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScanDiagnostics {
    /// References found per extractor id, before deduplication.
    pub extractor_hits: BTreeMap<String, usize>,
    /// Extractors that failed on this document and contributed nothing.
    pub failed_extractors: Vec<String>,
    /// Content variant that satisfied the rendered-content fallback, if it ran and hit.
    pub fallback_source: Option<ContentVariant>,
}

/// Findings for one document.
///
/// Id sets are deduplicated by form id per category; which matcher found an
/// id is only visible through `diagnostics`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentScanResult {
    pub document: Document,
    pub shortcode_form_ids: BTreeSet<FormId>,
    pub block_form_ids: BTreeSet<FormId>,
    pub builder_form_ids: BTreeSet<FormId>,
    pub has_login_form: bool,
    #[serde(default)]
    pub diagnostics: ScanDiagnostics,
}

impl DocumentScanResult {
    pub fn new(document: Document) -> Self {
        Self {
            document,
            shortcode_form_ids: BTreeSet::new(),
            block_form_ids: BTreeSet::new(),
            builder_form_ids: BTreeSet::new(),
            has_login_form: false,
            diagnostics: ScanDiagnostics::default(),
        }
    }

    /// Merge a reference into the id set of its category.
    pub fn add_reference(&mut self, reference: &FormReference) {
        self.ids_mut(reference.category()).insert(reference.form_id);
    }

    pub fn ids(&self, category: Category) -> &BTreeSet<FormId> {
        match category {
            Category::Shortcode => &self.shortcode_form_ids,
            Category::Block => &self.block_form_ids,
            Category::Builder => &self.builder_form_ids,
        }
    }

    fn ids_mut(&mut self, category: Category) -> &mut BTreeSet<FormId> {
        match category {
            Category::Shortcode => &mut self.shortcode_form_ids,
            Category::Block => &mut self.block_form_ids,
            Category::Builder => &mut self.builder_form_ids,
        }
    }

    /// A result is reportable only if it carries at least one finding.
    pub fn has_findings(&self) -> bool {
        self.has_login_form
            || !self.shortcode_form_ids.is_empty()
            || !self.block_form_ids.is_empty()
            || !self.builder_form_ids.is_empty()
    }

    /// Union of all three id sets.
    pub fn all_form_ids(&self) -> BTreeSet<FormId> {
        self.shortcode_form_ids
            .iter()
            .chain(&self.block_form_ids)
            .chain(&self.builder_form_ids)
            .copied()
            .collect()
    }
}

/// Result of one corpus scan.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScanSummary {
    pub total_documents_scanned: usize,
    /// Documents with at least one finding, in corpus order.
    pub matches: Vec<DocumentScanResult>,
}

impl ScanSummary {
    pub fn matched_count(&self) -> usize {
        self.matches.len()
    }

    /// Every form id referenced anywhere in the corpus.
    /// Useful for resolving statuses once instead of per row.
    pub fn distinct_form_ids(&self) -> BTreeSet<FormId> {
        self.matches.iter().flat_map(|m| m.all_form_ids()).collect()
    }
}

/// How a scan ended, in terms a report can show.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScanStatus {
    Complete { documents_with_forms: usize },
    NothingScanned,
    Failed { message: String, error_code: String },
}

impl ScanStatus {
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }

    /// Human-readable explanation of the outcome.
    pub fn message(&self) -> String {
        match self {
            Self::Complete { documents_with_forms: 0 } => {
                "Scan complete. No documents with forms were found.".to_string()
            }
            Self::Complete { documents_with_forms } => {
                format!("Scan complete. {documents_with_forms} document(s) with forms found.")
            }
            Self::NothingScanned => {
                "No documents were scanned. Ensure there are published documents to scan."
                    .to_string()
            }
            Self::Failed { .. } => {
                "There was an error processing the scan. Please try again later.".to_string()
            }
        }
    }
}

/// Infallible scan result: a summary (empty on failure) plus its status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanOutcome {
    pub summary: ScanSummary,
    pub status: ScanStatus,
}

impl ScanOutcome {
    pub fn from_summary(summary: ScanSummary) -> Self {
        let status = if summary.total_documents_scanned == 0 {
            ScanStatus::NothingScanned
        } else {
            ScanStatus::Complete {
                documents_with_forms: summary.matched_count(),
            }
        };
        Self { summary, status }
    }

    pub fn failed(message: impl Into<String>, error_code: impl Into<String>) -> Self {
        Self {
            summary: ScanSummary::default(),
            status: ScanStatus::Failed {
                message: message.into(),
                error_code: error_code.into(),
            },
        }
    }
}
