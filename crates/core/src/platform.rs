//! Host platform detection

use crate::constants::{LIST_DELIMITER_POSIX, LIST_DELIMITER_WINDOWS};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Platform family, as far as value rendering cares
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Platform {
    Windows,
    Linux,
    Darwin,
    Bsd,
    Unknown,
}

impl Platform {
    /// The platform this binary was compiled for
    #[must_use]
    pub fn current() -> Self {
        if cfg!(target_os = "windows") {
            Platform::Windows
        } else if cfg!(target_os = "macos") {
            Platform::Darwin
        } else if cfg!(target_os = "linux") {
            Platform::Linux
        } else if cfg!(any(
            target_os = "freebsd",
            target_os = "netbsd",
            target_os = "openbsd",
            target_os = "dragonfly"
        )) {
            Platform::Bsd
        } else {
            Platform::Unknown
        }
    }

    #[must_use]
    pub fn is_windows(self) -> bool {
        self == Platform::Windows
    }

    /// Delimiter used to join sequence values (`PATH`-style)
    #[must_use]
    pub fn list_delimiter(self) -> &'static str {
        if self.is_windows() {
            LIST_DELIMITER_WINDOWS
        } else {
            LIST_DELIMITER_POSIX
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Platform::Windows => "windows",
            Platform::Linux => "linux",
            Platform::Darwin => "darwin",
            Platform::Bsd => "bsd",
            Platform::Unknown => "unknown",
        };
        write!(f, "{name}")
    }
}
