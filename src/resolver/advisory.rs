//! Non-fatal conditions surfaced alongside a successful result.

use serde::Serialize;

use crate::core::{Backend, FlagId, Platform};
use crate::util::diagnostic::Diagnostic;

/// An expected, non-blocking condition reported to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "advisory", rename_all = "snake_case")]
pub enum Advisory {
    /// Neither `WITH_JPWL` nor `WITH_JP3D` is set under the manual Makefile;
    /// the jpwl/jp3d subdirectories have to be built separately.
    ManualTargetingRequired,

    /// A CMake-style flag was overridden but the manual Makefile does not read it.
    IgnoredUnderManualMakefile { flag: FlagId },

    /// A Makefile symbol was set for a backend that does not read it.
    ManualSymbolIgnored { flag: FlagId, backend: Backend },

    /// `CMAKE_OSX_ARCHITECTURES` only has an effect with CMake on macOS.
    OsxArchitecturesIgnored {
        platform: Platform,
        backend: Backend,
    },

    /// `BUILD_DOC` is on but Doxygen was not found.
    DocsSkipped,
}

impl Advisory {
    pub fn message(&self) -> String {
        match self {
            Advisory::ManualTargetingRequired => {
                "neither WITH_JPWL nor WITH_JP3D is set; build the jpwl and jp3d \
                 subdirectories separately if needed"
                    .to_string()
            }
            Advisory::IgnoredUnderManualMakefile { flag } => {
                format!("`{}` is ignored by the manual Makefile", flag)
            }
            Advisory::ManualSymbolIgnored { flag, backend } => {
                format!(
                    "`{}` only applies to the manual Makefile, ignored by {}",
                    flag, backend
                )
            }
            Advisory::OsxArchitecturesIgnored { platform, backend } => format!(
                "`CMAKE_OSX_ARCHITECTURES` has no effect with {} on {}",
                backend, platform
            ),
            Advisory::DocsSkipped => {
                "BUILD_DOC is enabled but Doxygen is not available; skipping documentation"
                    .to_string()
            }
        }
    }

    /// Convert to a warning diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let diag = Diagnostic::warning(self.message());
        match self {
            Advisory::ManualTargetingRequired => diag
                .with_suggestion("Set `WITH_JPWL=yes` or `WITH_JP3D=yes`")
                .with_suggestion("Run `make` inside jpwl/ or jp3d/"),
            Advisory::IgnoredUnderManualMakefile { .. } => {
                diag.with_suggestion("Use `WITH_JPWL` / `WITH_JP3D` with the manual Makefile")
            }
            Advisory::DocsSkipped => {
                diag.with_suggestion("Install Doxygen or pass `--doxygen` if it is available")
            }
            _ => diag,
        }
    }
}

impl std::fmt::Display for Advisory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}
