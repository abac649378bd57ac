//! Resolve the same overrides across every platform/backend pair.

use rayon::prelude::*;
use serde::Serialize;

use crate::core::{Backend, Platform};
use crate::resolver::errors::ResolveError;
use crate::resolver::resolve::{ConfigurationResolver, Overrides, Resolution};

/// Outcome for one platform/backend pair.
#[derive(Debug, Clone)]
pub struct MatrixEntry {
    pub platform: Platform,
    pub backend: Backend,
    pub outcome: Result<Resolution, ResolveError>,
}

/// Summary row suitable for printing or JSON output.
#[derive(Debug, Clone, Serialize)]
pub struct MatrixRow {
    pub platform: Platform,
    pub backend: Backend,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub advisories: Vec<String>,
}

impl MatrixEntry {
    pub fn row(&self) -> MatrixRow {
        let (status, error, advisories) = match &self.outcome {
            Ok(res) if res.has_advisories() => (
                "advisory",
                None,
                res.advisories.iter().map(|a| a.message()).collect(),
            ),
            Ok(_) => ("ok", None, Vec::new()),
            Err(e) => ("error", Some(e.to_string()), Vec::new()),
        };
        MatrixRow {
            platform: self.platform,
            backend: self.backend,
            status,
            error,
            advisories,
        }
    }
}

/// Every platform/backend pair in platform order, then backend order.
pub fn all_pairs() -> Vec<(Platform, Backend)> {
    Platform::ALL
        .into_iter()
        .flat_map(|p| Backend::ALL.into_iter().map(move |b| (p, b)))
        .collect()
}

/// Resolve `overrides` for every pair in parallel. Results keep the
/// order of [`all_pairs`].
pub fn resolve_matrix(
    resolver: &ConfigurationResolver<'_>,
    overrides: &Overrides,
) -> Vec<MatrixEntry> {
    all_pairs()
        .into_par_iter()
        .map(|(platform, backend)| MatrixEntry {
            platform,
            backend,
            outcome: resolver.resolve(platform, backend, overrides),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matrix_covers_every_pair_in_order() {
        let entries = resolve_matrix(&ConfigurationResolver::new(), &Overrides::new());
        assert_eq!(entries.len(), 12);
        assert_eq!(
            (entries[0].platform, entries[0].backend),
            (Platform::Unix, Backend::Autotools)
        );
        assert_eq!(
            (entries[11].platform, entries[11].backend),
            (Platform::WindowsNative, Backend::ManualMakefile)
        );
    }

    #[test]
    fn test_matrix_matches_sequential_resolution() {
        let resolver = ConfigurationResolver::new();
        let overrides = Overrides::new().set("BUILD_JP3D", true);
        for entry in resolve_matrix(&resolver, &overrides) {
            let sequential = resolver.resolve(entry.platform, entry.backend, &overrides);
            assert_eq!(entry.outcome, sequential);
        }
    }

    #[test]
    fn test_matrix_rows() {
        let entries = resolve_matrix(&ConfigurationResolver::new(), &Overrides::new());
        let errors = entries.iter().filter(|e| e.row().status == "error").count();
        // Autotools and manual on native Windows.
        assert_eq!(errors, 2);

        let manual_unix = entries
            .iter()
            .find(|e| e.platform == Platform::Unix && e.backend == Backend::ManualMakefile)
            .unwrap();
        assert_eq!(manual_unix.row().status, "advisory");
    }
}
