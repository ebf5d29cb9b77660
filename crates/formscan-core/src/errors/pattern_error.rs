//! Pattern compilation errors.

use super::error_code::{self, FormscanErrorCode};

/// Errors raised while compiling configured matchers.
///
/// Matching itself is total over strings; these only surface when a
/// user-supplied builder tag or window cannot become a valid matcher.
#[derive(Debug, thiserror::Error)]
pub enum PatternError {
    #[error("Invalid pattern '{id}': {message}")]
    InvalidPattern { id: String, message: String },

    #[error("Builder tag for '{builder}' is invalid: '{tag}'")]
    InvalidTag { builder: String, tag: String },

    #[error("Builder tag '{tag}' declares no id attributes")]
    NoAttributes { tag: String },
}

impl FormscanErrorCode for PatternError {
    fn error_code(&self) -> &'static str {
        error_code::PATTERN_ERROR
    }
}
