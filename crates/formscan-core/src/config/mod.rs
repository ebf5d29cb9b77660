//! Configuration system for formscan.
//! TOML-based, layered resolution: overrides > env > project > user > defaults.

pub mod detection_config;
pub mod formscan_config;
pub mod scan_config;

pub use detection_config::{BuilderTagDef, DetectionConfig};
pub use formscan_config::{ConfigOverrides, FormscanConfig};
pub use scan_config::ScanConfig;
