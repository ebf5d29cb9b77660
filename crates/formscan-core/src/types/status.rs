//! Form status as classified by the external status resolver.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Lifecycle state of a referenced form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormStatus {
    Active,
    Inactive,
    Trash,
    Deleted,
    /// The forms store could not be consulted.
    Unknown,
}

impl FormStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
            Self::Trash => "trash",
            Self::Deleted => "deleted",
            Self::Unknown => "unknown",
        }
    }

    /// Short annotation shown next to a form id in reports.
    /// Active and unknown forms carry none.
    pub fn annotation(&self) -> Option<&'static str> {
        match self {
            Self::Inactive => Some("(Inactive)"),
            Self::Trash => Some("(Trashed)"),
            Self::Deleted => Some("(Deleted)"),
            Self::Active | Self::Unknown => None,
        }
    }

    /// Whether a reference to a form in this state is broken on the live page.
    pub fn needs_attention(&self) -> bool {
        matches!(self, Self::Inactive | Self::Trash | Self::Deleted)
    }
}

impl fmt::Display for FormStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
