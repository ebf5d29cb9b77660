//! Corpus retrieval errors.

use super::error_code::{self, FormscanErrorCode};

/// Errors raised when the document store cannot be queried.
/// Fatal to a scan: no document is scanned once retrieval fails.
#[derive(Debug, thiserror::Error)]
pub enum RetrievalError {
    #[error("Document query failed: {message}")]
    QueryFailed { message: String },

    #[error("Document source unavailable: {reason}")]
    Unavailable { reason: String },

    #[error("Malformed document record {document_id}: {message}")]
    MalformedRecord { document_id: u64, message: String },
}

impl FormscanErrorCode for RetrievalError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Unavailable { .. } => error_code::SOURCE_UNAVAILABLE,
            _ => error_code::RETRIEVAL_ERROR,
        }
    }
}
