//! Rendered-content errors.

use super::error_code::{self, FormscanErrorCode};

/// Errors from the best-effort content rendering collaborator.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("No renderer available for document {document_id}")]
    Unavailable { document_id: u64 },

    #[error("Rendering document {document_id} failed: {message}")]
    Failed { document_id: u64, message: String },
}

impl FormscanErrorCode for RenderError {
    fn error_code(&self) -> &'static str {
        error_code::RENDER_ERROR
    }
}
