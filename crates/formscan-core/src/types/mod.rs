//! Data model for formscan.
//! Documents in, per-document findings and scan summaries out.

pub mod collections;
pub mod content;
pub mod document;
pub mod reference;
pub mod result;
pub mod status;

pub use collections::{FxHashMap, FxHashSet, SmallVec, SmallVec4};
pub use content::ContentVariant;
pub use document::Document;
pub use reference::{Category, FormId, FormReference, SourceKind};
pub use result::{DocumentScanResult, ScanDiagnostics, ScanOutcome, ScanStatus, ScanSummary};
pub use status::FormStatus;
