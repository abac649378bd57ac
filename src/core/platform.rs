//! Target platforms the codec project can be configured for.

use serde::{Deserialize, Serialize};

/// Host platform a build is configured on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Platform {
    /// Linux and other Unix-like systems
    Unix,
    /// macOS / Darwin
    #[serde(rename = "macos")]
    MacOS,
    /// Windows with a Cygwin environment (behaves like Unix)
    #[serde(rename = "win-cygwin")]
    WindowsCygwin,
    /// Windows without Cygwin (Visual Studio, NMake, MinGW)
    #[serde(rename = "win-native")]
    WindowsNative,
}

impl Platform {
    /// All platforms, in declaration order.
    pub const ALL: [Platform; 4] = [
        Platform::Unix,
        Platform::MacOS,
        Platform::WindowsCygwin,
        Platform::WindowsNative,
    ];

    /// Get the platform name as used on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Unix => "unix",
            Platform::MacOS => "macos",
            Platform::WindowsCygwin => "win-cygwin",
            Platform::WindowsNative => "win-native",
        }
    }

    /// Whether the platform provides a Unix userland (sh, make, autotools).
    pub fn has_unix_userland(&self) -> bool {
        !matches!(self, Platform::WindowsNative)
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Platform {
    type Err = PlatformParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "unix" | "linux" => Ok(Platform::Unix),
            "macos" | "osx" | "darwin" => Ok(Platform::MacOS),
            "win-cygwin" | "cygwin" => Ok(Platform::WindowsCygwin),
            "win-native" | "windows" => Ok(Platform::WindowsNative),
            _ => Err(PlatformParseError(s.to_string())),
        }
    }
}

/// Error returned when parsing an invalid platform name.
#[derive(Debug, Clone)]
pub struct PlatformParseError(pub String);

impl std::fmt::Display for PlatformParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid platform '{}', valid values: unix, macos, win-cygwin, win-native",
            self.0
        )
    }
}

impl std::error::Error for PlatformParseError {}
