//! Scan-level errors.

use super::error_code::{self, FormscanErrorCode};
use super::{ConfigError, ParseError, PatternError, RenderError, RetrievalError};

/// Errors surfaced by the scanning entry points.
/// Aggregates subsystem errors via `From` conversions.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("Retrieval error: {0}")]
    Retrieval(#[from] RetrievalError),

    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("Pattern error: {0}")]
    Pattern(#[from] PatternError),

    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Extractor {extractor} panicked: {message}")]
    ExtractorPanic { extractor: String, message: String },
}

impl FormscanErrorCode for ScanError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Retrieval(e) => e.error_code(),
            Self::Parse(e) => e.error_code(),
            Self::Pattern(e) => e.error_code(),
            Self::Render(e) => e.error_code(),
            Self::Config(e) => e.error_code(),
            Self::ExtractorPanic { .. } => error_code::EXTRACTOR_PANIC,
        }
    }
}
