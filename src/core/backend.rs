//! Build backend families.

use serde::{Deserialize, Serialize};

use super::platform::Platform;

/// The build-system family whose semantics govern a configuration.
///
/// The set is closed: every consumer matches on it exhaustively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// `./bootstrap.sh && ./configure && make`
    Autotools,
    /// `cmake` with a generator
    #[serde(rename = "cmake")]
    CMake,
    /// Top-level Makefile with a hand-edited `opj_config.h`
    #[serde(rename = "manual")]
    ManualMakefile,
}

impl Backend {
    /// All backends, in declaration order.
    pub const ALL: [Backend; 3] = [Backend::Autotools, Backend::CMake, Backend::ManualMakefile];

    /// Get the backend name as used on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            Backend::Autotools => "autotools",
            Backend::CMake => "cmake",
            Backend::ManualMakefile => "manual",
        }
    }

    /// Whether this backend can drive a build on the given platform.
    ///
    /// Autotools and the manual Makefile need a Unix userland.
    pub fn supports(&self, platform: Platform) -> bool {
        match self {
            Backend::CMake => true,
            Backend::Autotools | Backend::ManualMakefile => platform.has_unix_userland(),
        }
    }
}

impl std::fmt::Display for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Backend {
    type Err = BackendParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "autotools" | "configure" => Ok(Backend::Autotools),
            "cmake" => Ok(Backend::CMake),
            "manual" | "makefile" => Ok(Backend::ManualMakefile),
            _ => Err(BackendParseError(s.to_string())),
        }
    }
}

/// Error returned when parsing an invalid backend name.
#[derive(Debug, Clone)]
pub struct BackendParseError(pub String);

impl std::fmt::Display for BackendParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid backend '{}', valid values: autotools, cmake, manual",
            self.0
        )
    }
}

impl std::error::Error for BackendParseError {}
