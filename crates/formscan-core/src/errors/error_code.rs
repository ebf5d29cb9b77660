//! FormscanErrorCode trait for stable, machine-readable error codes.

/// Trait giving every formscan error a stable code string.
/// The code travels with diagnostic events so observers can group failures
/// without parsing messages.
pub trait FormscanErrorCode {
    /// Returns the error code string (e.g., "RETRIEVAL_ERROR").
    fn error_code(&self) -> &'static str;

    /// Returns the formatted error string: `[ERROR_CODE] message`.
    fn coded_string(&self) -> String
    where
        Self: std::fmt::Display,
    {
        format!("[{}] {}", self.error_code(), self)
    }
}

pub const RETRIEVAL_ERROR: &str = "RETRIEVAL_ERROR";
pub const SOURCE_UNAVAILABLE: &str = "SOURCE_UNAVAILABLE";
pub const PARSE_ERROR: &str = "PARSE_ERROR";
pub const DEPTH_EXCEEDED: &str = "DEPTH_EXCEEDED";
pub const PATTERN_ERROR: &str = "PATTERN_ERROR";
pub const RENDER_ERROR: &str = "RENDER_ERROR";
pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
pub const CONFIG_INVALID: &str = "CONFIG_INVALID";
pub const EXTRACTOR_PANIC: &str = "EXTRACTOR_PANIC";
