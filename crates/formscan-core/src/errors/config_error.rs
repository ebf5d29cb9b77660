//! Configuration errors.

use super::error_code::{self, FormscanErrorCode};
use crate::types::ContentVariant;

/// Why a configuration layer was rejected.
///
/// File and syntax problems abort loading; the remaining variants come from
/// `FormscanConfig::validate` and the `FORMSCAN_*` environment layer.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Cannot read config file {path}: {message}")]
    Unreadable { path: String, message: String },

    #[error("Invalid TOML in {origin}: {message}")]
    InvalidToml { origin: String, message: String },

    #[error("Cannot serialize config: {message}")]
    Serialize { message: String },

    #[error("{field} must be at least 1")]
    ZeroLimit { field: &'static str },

    #[error("Unknown content variant '{value}' (expected body, raw, filtered or rendered)")]
    UnknownVariant { value: String },

    #[error("Content variant '{variant}' appears more than once in scan.fallback_order")]
    DuplicateVariant { variant: ContentVariant },

    #[error("Builder tag '{tag}' for '{builder}': {message}")]
    InvalidBuilderTag {
        builder: String,
        tag: String,
        message: String,
    },

    #[error("{var}='{value}' is not a valid {expected}")]
    InvalidEnv {
        var: &'static str,
        value: String,
        expected: &'static str,
    },
}

impl FormscanErrorCode for ConfigError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Unreadable { .. } | Self::InvalidToml { .. } | Self::Serialize { .. } => {
                error_code::CONFIG_ERROR
            }
            _ => error_code::CONFIG_INVALID,
        }
    }
}
