//! Resolution error types and diagnostics.

use miette::Diagnostic as MietteDiagnostic;
use thiserror::Error;

use crate::core::{Backend, Platform};
use crate::util::diagnostic::Diagnostic;

/// A fatal configuration error. Resolution is all-or-nothing: when one of
/// these is returned no configuration exists.
#[derive(Debug, Clone, PartialEq, Eq, Error, MietteDiagnostic)]
pub enum ResolveError {
    #[error("unknown flag `{flag}`")]
    #[diagnostic(
        code(jp2build::resolve::unknown_flag),
        help("Run `jp2build flags` to list recognized options")
    )]
    UnknownFlag {
        flag: String,
        suggestions: Vec<String>,
    },

    #[error("flag `{flag}` expects a {expected} value, found {found}")]
    #[diagnostic(code(jp2build::resolve::type_mismatch))]
    TypeMismatch {
        flag: String,
        expected: &'static str,
        found: String,
        allowed: Vec<String>,
    },

    #[error("flag `{flag}` is only available on {required}, not {platform}")]
    #[diagnostic(code(jp2build::resolve::platform_flag_mismatch))]
    PlatformFlagMismatch {
        flag: String,
        platform: Platform,
        required: Platform,
    },

    #[error("backend `{backend}` cannot be used on {platform}")]
    #[diagnostic(
        code(jp2build::resolve::backend_platform_mismatch),
        help("Use the cmake backend, or build from a Cygwin shell")
    )]
    BackendPlatformMismatch {
        backend: Backend,
        platform: Platform,
    },

    #[error("flag `{flag}` is required when `{required_by}` is enabled")]
    #[diagnostic(code(jp2build::resolve::missing_required_flag))]
    MissingRequiredFlag { flag: String, required_by: String },
}

impl ResolveError {
    /// The flag the error is about, if any.
    pub fn flag(&self) -> Option<&str> {
        match self {
            ResolveError::UnknownFlag { flag, .. }
            | ResolveError::TypeMismatch { flag, .. }
            | ResolveError::PlatformFlagMismatch { flag, .. }
            | ResolveError::MissingRequiredFlag { flag, .. } => Some(flag),
            ResolveError::BackendPlatformMismatch { .. } => None,
        }
    }

    /// The legality rule that was violated.
    pub fn rule(&self) -> &'static str {
        match self {
            ResolveError::UnknownFlag { .. } => "every flag must be registered",
            ResolveError::TypeMismatch { .. } => "every value must match its flag's kind",
            ResolveError::PlatformFlagMismatch { .. } => {
                "BUILD_INDEXER_JPIP requires native Windows"
            }
            ResolveError::BackendPlatformMismatch { .. } => {
                "autotools and the manual Makefile need a Unix or Cygwin environment"
            }
            ResolveError::MissingRequiredFlag { .. } => {
                "BUILD_TESTING requires JPEG2000_CONFORMANCE_DATA_ROOT"
            }
        }
    }

    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let diag =
            Diagnostic::error(self.to_string()).with_context(format!("rule: {}", self.rule()));

        match self {
            ResolveError::UnknownFlag { suggestions, .. } => {
                let diag = if suggestions.is_empty() {
                    diag
                } else {
                    diag.with_context(format!("did you mean: {}?", suggestions.join(", ")))
                };
                diag.with_suggestion("Run `jp2build flags` to list recognized options")
            }

            ResolveError::TypeMismatch { flag, allowed, .. } => {
                let diag = if allowed.is_empty() {
                    diag
                } else {
                    diag.with_context(format!("allowed values: {}", allowed.join(", ")))
                };
                diag.with_suggestion(format!("Pass a valid value, e.g. `--set {}=...`", flag))
            }

            ResolveError::PlatformFlagMismatch { flag, required, .. } => diag
                .with_suggestion(format!("Remove `{}` from the overrides", flag))
                .with_suggestion(format!("Configure for `--platform {}`", required)),

            ResolveError::BackendPlatformMismatch { .. } => diag
                .with_suggestion("Use `--backend cmake`".to_string())
                .with_suggestion("Use `--platform win-cygwin` from a Cygwin shell".to_string()),

            ResolveError::MissingRequiredFlag { flag, required_by } => diag
                .with_suggestion(format!("Set `{}=<path>`", flag))
                .with_suggestion(format!("Disable `{}`", required_by)),
        }
    }
}
