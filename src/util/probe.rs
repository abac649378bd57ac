//! Host capability probes.

use std::path::PathBuf;

/// Find an executable in PATH.
pub fn find_executable(name: &str) -> Option<PathBuf> {
    which::which(name).ok()
}

/// Whether Doxygen is installed.
pub fn doxygen_available() -> bool {
    find_executable("doxygen").is_some()
}

/// Whether MinGW's make is installed.
pub fn mingw_make_available() -> bool {
    find_executable("mingw32-make").is_some()
}
