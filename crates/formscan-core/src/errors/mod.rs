//! Error handling for formscan.
//! One error enum per concern, `thiserror` only.

pub mod config_error;
pub mod error_code;
pub mod parse_error;
pub mod pattern_error;
pub mod render_error;
pub mod retrieval_error;
pub mod scan_error;

pub use config_error::ConfigError;
pub use error_code::FormscanErrorCode;
pub use parse_error::ParseError;
pub use pattern_error::PatternError;
pub use render_error::RenderError;
pub use retrieval_error::RetrievalError;
pub use scan_error::ScanError;
