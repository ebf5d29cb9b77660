//! Structured-metadata parse errors.

use super::error_code::{self, FormscanErrorCode};

/// Errors that can occur while normalizing a builder's metadata blob into a tree.
/// Always recovered locally: the builder contributes nothing for that document.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Invalid JSON in metadata '{key}': {message}")]
    InvalidJson { key: String, message: String },

    #[error("Invalid serialized data in metadata '{key}' at byte {offset}: {message}")]
    InvalidSerialized {
        key: String,
        offset: usize,
        message: String,
    },

    #[error("Unrecognized metadata encoding for '{key}'")]
    UnrecognizedEncoding { key: String },

    #[error("Metadata '{key}' has unexpected shape: expected {expected}")]
    UnexpectedShape { key: String, expected: &'static str },

    #[error("Metadata '{key}' nests deeper than {limit} levels")]
    DepthExceeded { key: String, limit: usize },
}

impl FormscanErrorCode for ParseError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::DepthExceeded { .. } => error_code::DEPTH_EXCEEDED,
            _ => error_code::PARSE_ERROR,
        }
    }
}
