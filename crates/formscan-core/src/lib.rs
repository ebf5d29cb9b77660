//! formscan-core: shared foundation for the formscan detection engine.
//!
//! - Types: documents, form references, per-document results, scan summaries
//! - Traits: the document-store and status-resolver collaborator seams
//! - Errors: one `thiserror` enum per concern, each with a stable error code
//! - Config: TOML-based layered configuration
//! - Events: synchronous diagnostic event dispatch
//! - Tracing: subscriber initialization

pub mod config;
pub mod errors;
pub mod events;
pub mod tracing;
pub mod traits;
pub mod types;

pub use config::FormscanConfig;
pub use errors::{ParseError, PatternError, RenderError, RetrievalError, ScanError};
pub use traits::{DocumentSource, FormStatusResolver};
pub use types::{
    Category, Document, DocumentScanResult, FormId, FormReference, FormStatus, ScanOutcome,
    ScanStatus, ScanSummary, SourceKind,
};
