//! Top-level formscan configuration with layered resolution.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::detection_config::is_valid_identifier;
use super::{DetectionConfig, ScanConfig};
use crate::errors::ConfigError;
use crate::types::ContentVariant;

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. Explicit overrides (applied via `apply_overrides`)
/// 2. Environment variables (`FORMSCAN_*`)
/// 3. Project config (`formscan.toml` in the project root)
/// 4. User config (`~/.formscan/config.toml`)
/// 5. Compiled defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct FormscanConfig {
    pub scan: ScanConfig,
    pub detection: DetectionConfig,
}

/// Caller-supplied overrides, applied last.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub threads: Option<usize>,
    pub max_depth: Option<usize>,
    pub fallback_order: Option<Vec<ContentVariant>>,
    pub rendered_fallback: Option<bool>,
}

impl FormscanConfig {
    /// Load configuration with layered resolution rooted at `root`.
    pub fn load(root: &Path, overrides: Option<&ConfigOverrides>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        // Layer 4 (lowest priority): user config
        if let Some(user_config_path) = Self::user_config_path() {
            if user_config_path.exists() {
                match Self::merge_toml_file(&mut config, &user_config_path) {
                    Ok(()) => {}
                    Err(e @ ConfigError::InvalidToml { .. }) => return Err(e),
                    Err(e) => {
                        tracing::warn!(error = %e, "ignoring unreadable user config");
                    }
                }
            }
        }

        // Layer 3: project config
        let project_config_path = root.join("formscan.toml");
        if project_config_path.exists() {
            Self::merge_toml_file(&mut config, &project_config_path)?;
        }

        // Layer 2: environment variables
        Self::apply_env_overrides(&mut config)?;

        // Layer 1 (highest priority): explicit overrides
        if let Some(overrides) = overrides {
            Self::apply_overrides(&mut config, overrides);
        }

        Self::validate(&config)?;

        Ok(config)
    }

    /// Load configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| ConfigError::InvalidToml {
            origin: "<string>".to_string(),
            message: e.to_string(),
        })
    }

    /// Validate the configuration values.
    pub fn validate(config: &FormscanConfig) -> Result<(), ConfigError> {
        let limits = [
            ("scan.threads", config.scan.threads),
            ("scan.max_depth", config.scan.max_depth),
            ("detection.addon_window", config.detection.addon_window),
        ];
        if let Some((field, _)) = limits.iter().find(|(_, value)| *value == Some(0)) {
            return Err(ConfigError::ZeroLimit { field: *field });
        }

        let mut seen = HashSet::new();
        if let Some(&variant) = config.scan.fallback_order.iter().find(|v| !seen.insert(**v)) {
            return Err(ConfigError::DuplicateVariant { variant });
        }

        for def in &config.detection.builder_tags {
            let invalid = |message: String| ConfigError::InvalidBuilderTag {
                builder: def.builder.clone(),
                tag: def.tag.clone(),
                message,
            };
            if def.builder.trim().is_empty() {
                return Err(invalid("builder name is empty".to_string()));
            }
            if !is_valid_identifier(&def.tag) {
                return Err(invalid("tag name may only hold letters, digits, '_' and '-'".to_string()));
            }
            if let Some(bad) = def.attributes.iter().find(|a| !is_valid_identifier(a)) {
                return Err(invalid(format!("'{bad}' is not a valid attribute name")));
            }
        }
        Ok(())
    }

    /// Returns the user config path: `~/.formscan/config.toml`.
    fn user_config_path() -> Option<PathBuf> {
        home_dir().map(|h| h.join(".formscan").join("config.toml"))
    }

    /// Merge a TOML file into the existing config.
    /// Unknown keys are silently ignored (forward-compatible).
    fn merge_toml_file(config: &mut FormscanConfig, path: &Path) -> Result<(), ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Unreadable {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        let file_config: FormscanConfig =
            toml::from_str(&content).map_err(|e| ConfigError::InvalidToml {
                origin: path.display().to_string(),
                message: e.to_string(),
            })?;

        Self::merge(config, &file_config);
        Ok(())
    }

    /// Merge `other` into `base`; `other` wins wherever it sets a value.
    fn merge(base: &mut FormscanConfig, other: &FormscanConfig) {
        // Scan
        if other.scan.threads.is_some() {
            base.scan.threads = other.scan.threads;
        }
        if other.scan.max_depth.is_some() {
            base.scan.max_depth = other.scan.max_depth;
        }
        if !other.scan.fallback_order.is_empty() {
            base.scan.fallback_order = other.scan.fallback_order.clone();
        }
        if other.scan.rendered_fallback.is_some() {
            base.scan.rendered_fallback = other.scan.rendered_fallback;
        }

        // Detection
        if !other.detection.builder_tags.is_empty() {
            base.detection.builder_tags = other.detection.builder_tags.clone();
        }
        if other.detection.addon_window.is_some() {
            base.detection.addon_window = other.detection.addon_window;
        }
        if !other.detection.disabled_extractors.is_empty() {
            base.detection.disabled_extractors = other.detection.disabled_extractors.clone();
        }
        if !other.detection.elementor_form_keys.is_empty() {
            base.detection.elementor_form_keys = other.detection.elementor_form_keys.clone();
        }
        if !other.detection.beaver_form_keys.is_empty() {
            base.detection.beaver_form_keys = other.detection.beaver_form_keys.clone();
        }
        if !other.detection.vendor_markers.is_empty() {
            base.detection.vendor_markers = other.detection.vendor_markers.clone();
        }
    }

    /// Apply environment variable overrides.
    /// Pattern: `FORMSCAN_SCAN_THREADS`, `FORMSCAN_DETECTION_ADDON_WINDOW`, etc.
    /// A set but malformed variable is an error rather than silently ignored.
    fn apply_env_overrides(config: &mut FormscanConfig) -> Result<(), ConfigError> {
        if let Some(v) = env_value("FORMSCAN_SCAN_THREADS", "thread count")? {
            config.scan.threads = Some(v);
        }
        if let Some(v) = env_value("FORMSCAN_SCAN_MAX_DEPTH", "depth")? {
            config.scan.max_depth = Some(v);
        }
        if let Some(v) = env_value("FORMSCAN_SCAN_RENDERED_FALLBACK", "boolean")? {
            config.scan.rendered_fallback = Some(v);
        }
        if let Ok(val) = std::env::var("FORMSCAN_SCAN_FALLBACK_ORDER") {
            config.scan.fallback_order = parse_fallback_order(&val)?;
        }
        if let Some(v) = env_value("FORMSCAN_DETECTION_ADDON_WINDOW", "byte window")? {
            config.detection.addon_window = Some(v);
        }
        Ok(())
    }

    /// Apply explicit overrides (highest priority).
    fn apply_overrides(config: &mut FormscanConfig, overrides: &ConfigOverrides) {
        if let Some(v) = overrides.threads {
            config.scan.threads = Some(v);
        }
        if let Some(v) = overrides.max_depth {
            config.scan.max_depth = Some(v);
        }
        if let Some(ref v) = overrides.fallback_order {
            config.scan.fallback_order = v.clone();
        }
        if let Some(v) = overrides.rendered_fallback {
            config.scan.rendered_fallback = Some(v);
        }
    }

    /// Serialize the config back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize {
            message: e.to_string(),
        })
    }
}

/// Parse a comma-separated precedence list such as `rendered,body`.
pub fn parse_fallback_order(value: &str) -> Result<Vec<ContentVariant>, ConfigError> {
    value
        .split(',')
        .filter(|part| !part.trim().is_empty())
        .map(|part| {
            part.parse::<ContentVariant>()
                .map_err(|_| ConfigError::UnknownVariant {
                    value: part.trim().to_string(),
                })
        })
        .collect()
}

/// Read and parse one environment variable; unset is `None`.
fn env_value<T: FromStr>(var: &'static str, expected: &'static str) -> Result<Option<T>, ConfigError> {
    let Ok(value) = std::env::var(var) else {
        return Ok(None);
    };
    match value.trim().parse::<T>() {
        Ok(parsed) => Ok(Some(parsed)),
        Err(_) => Err(ConfigError::InvalidEnv {
            var,
            value,
            expected,
        }),
    }
}

/// Cross-platform home directory resolution.
fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(PathBuf::from)
}
