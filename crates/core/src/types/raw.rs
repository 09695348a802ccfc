//! Raw-name overrides for external key projection

use serde::{Deserialize, Serialize};

/// How a node's name is projected onto an external key
///
/// - `Off`: use the computed fully-qualified name
/// - `Bare`: use the local name only, skipping namespace prefixing
/// - `Name`: use the literal string as given
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RawOverride {
    #[default]
    Off,
    Bare,
    Name(String),
}

impl RawOverride {
    /// Whether this override short-circuits path-based naming
    #[must_use]
    pub fn is_set(&self) -> bool {
        !matches!(self, RawOverride::Off)
    }
}

impl From<bool> for RawOverride {
    fn from(raw: bool) -> Self {
        if raw {
            RawOverride::Bare
        } else {
            RawOverride::Off
        }
    }
}

// An empty literal behaves like no override at all
impl From<&str> for RawOverride {
    fn from(name: &str) -> Self {
        if name.is_empty() {
            RawOverride::Off
        } else {
            RawOverride::Name(name.to_string())
        }
    }
}

impl From<String> for RawOverride {
    fn from(name: String) -> Self {
        RawOverride::from(name.as_str())
    }
}
