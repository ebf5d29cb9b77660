//! Collaborator seams: where formscan meets the host's stores.

pub mod document_source;
pub mod status_resolver;

pub use document_source::DocumentSource;
pub use status_resolver::{FormRecord, FormRecordStore, FormStatusResolver};
