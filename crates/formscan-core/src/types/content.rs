//! Content variants consulted by the rendered-content fallback.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One of the content sources a document can be read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentVariant {
    /// The body carried on the `Document` itself.
    Body,
    /// The body as currently stored by the document source.
    Raw,
    /// The stored, host-filtered variant of the body.
    Filtered,
    /// The body after the host's rendering pipeline.
    Rendered,
}

impl ContentVariant {
    /// Default fallback precedence.
    pub const DEFAULT_ORDER: [ContentVariant; 4] =
        [Self::Body, Self::Raw, Self::Filtered, Self::Rendered];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Body => "body",
            Self::Raw => "raw",
            Self::Filtered => "filtered",
            Self::Rendered => "rendered",
        }
    }
}

impl fmt::Display for ContentVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ContentVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "body" => Ok(Self::Body),
            "raw" => Ok(Self::Raw),
            "filtered" => Ok(Self::Filtered),
            "rendered" => Ok(Self::Rendered),
            other => Err(format!("unknown content variant '{other}'")),
        }
    }
}
