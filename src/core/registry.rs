//! The catalog of recognized build options.
//!
//! The registry is static and read-only, so any number of concurrent
//! resolutions can share it.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use crate::core::flag::{Flag, FlagId, FlagKind, FlagValue};
use crate::core::flag_set::FlagSet;
use crate::resolver::errors::ResolveError;

/// Canonical spellings accepted for `CMAKE_BUILD_TYPE`.
pub const BUILD_TYPES: &[&str] = &["Debug", "Release", "RelWithDebInfo", "MinSizeRel"];

static REGISTRY: LazyLock<FlagRegistry> = LazyLock::new(FlagRegistry::new);

/// Authoritative list of build options and their defaults.
#[derive(Debug)]
pub struct FlagRegistry {
    flags: BTreeMap<FlagId, Flag>,
}

impl FlagRegistry {
    fn new() -> Self {
        let entries = [
            flag(
                FlagId::BuildSharedLibs,
                FlagKind::Boolean,
                Some(FlagValue::Bool(true)),
                "Build shared libraries and link executables dynamically",
            ),
            flag(
                FlagId::BuildCodec,
                FlagKind::Boolean,
                Some(FlagValue::Bool(true)),
                "Build the codec executables (image_to_j2k, j2k_to_image, j2k_dump)",
            ),
            flag(
                FlagId::BuildMj2,
                FlagKind::Boolean,
                Some(FlagValue::Bool(false)),
                "Build the Motion JPEG 2000 executables",
            ),
            flag(
                FlagId::BuildJpwl,
                FlagKind::Boolean,
                Some(FlagValue::Bool(false)),
                "Build the JPWL (wireless) library and executables",
            ),
            flag(
                FlagId::BuildJp3d,
                FlagKind::Boolean,
                Some(FlagValue::Bool(false)),
                "Build the JP3D (volumetric) library and executables",
            ),
            flag(
                FlagId::BuildIndexerJpip,
                FlagKind::Boolean,
                Some(FlagValue::Bool(false)),
                "Build the JPIP indexer (Windows only)",
            ),
            flag(
                FlagId::BuildDoc,
                FlagKind::Boolean,
                Some(FlagValue::Bool(false)),
                "Generate API documentation with Doxygen",
            ),
            flag(
                FlagId::BuildTesting,
                FlagKind::Boolean,
                Some(FlagValue::Bool(false)),
                "Build and run the conformance test suite",
            ),
            flag(
                FlagId::CmakeInstallPrefix,
                FlagKind::Path,
                None,
                "Installation prefix",
            ),
            flag(
                FlagId::CmakeOsxArchitectures,
                FlagKind::String,
                None,
                "Semicolon-separated macOS architectures (CMake on macOS only)",
            ),
            flag(
                FlagId::CmakeBuildType,
                FlagKind::Enum(BUILD_TYPES),
                Some(FlagValue::Enum("Release".to_string())),
                "CMake build configuration",
            ),
            flag(
                FlagId::Jpeg2000ConformanceDataRoot,
                FlagKind::Path,
                None,
                "Location of the JPEG 2000 conformance data (required for testing)",
            ),
            flag(
                FlagId::WithJpwl,
                FlagKind::Boolean,
                Some(FlagValue::Bool(false)),
                "Makefile symbol: also build the jpwl subdirectory",
            ),
            flag(
                FlagId::WithJp3d,
                FlagKind::Boolean,
                Some(FlagValue::Bool(false)),
                "Makefile symbol: also build the jp3d subdirectory",
            ),
        ];

        let mut flags = BTreeMap::new();
        for entry in entries {
            let previous = flags.insert(entry.id, entry);
            debug_assert!(previous.is_none(), "duplicate flag in registry");
        }

        FlagRegistry { flags }
    }

    /// The shared registry instance.
    pub fn global() -> &'static FlagRegistry {
        &REGISTRY
    }

    /// Look up a flag by name.
    pub fn lookup(&self, name: &str) -> Result<&Flag, ResolveError> {
        FlagId::from_name(name)
            .and_then(|id| self.flags.get(&id))
            .ok_or_else(|| ResolveError::UnknownFlag {
                flag: name.to_string(),
                suggestions: self.suggest(name),
            })
    }

    /// Get a flag by identifier.
    pub fn get(&self, id: FlagId) -> &Flag {
        // Every FlagId is registered in `new`.
        &self.flags[&id]
    }

    /// Iterate over all flags in name order.
    pub fn iter(&self) -> impl Iterator<Item = &Flag> {
        self.flags.values()
    }

    /// The full default assignment.
    pub fn defaults(&self) -> FlagSet {
        let mut set = FlagSet::new();
        for flag in self.flags.values() {
            if let Some(ref value) = flag.default {
                set.insert(flag.id, value.clone());
            }
        }
        set
    }

    /// Names that differ from `name` only in case or separators.
    fn suggest(&self, name: &str) -> Vec<String> {
        let normalized = normalize(name);
        self.flags
            .values()
            .filter(|f| {
                let candidate = normalize(f.name());
                candidate == normalized
                    || (normalized.len() >= 4 && candidate.contains(&normalized))
            })
            .map(|f| f.name().to_string())
            .collect()
    }
}

fn flag(
    id: FlagId,
    kind: FlagKind,
    default: Option<FlagValue>,
    description: &'static str,
) -> Flag {
    Flag {
        id,
        kind,
        default,
        description,
    }
}

fn normalize(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_uppercase())
        .collect()
}
