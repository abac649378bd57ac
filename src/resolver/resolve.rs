//! Configuration resolution.
//!
//! A `ResolvedConfiguration` is immutable once created. Changing any input
//! means resolving again, which produces a new instance.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::core::flag::{FlagId, FlagKind, OverrideValue};
use crate::core::{Backend, FlagRegistry, FlagSet, Platform};
use crate::resolver::advisory::Advisory;
use crate::resolver::errors::ResolveError;

/// How executables link against the project's libraries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkMode {
    Shared,
    Static,
}

impl LinkMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            LinkMode::Shared => "shared",
            LinkMode::Static => "static",
        }
    }
}

impl std::fmt::Display for LinkMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// User-supplied flag overrides, keyed by flag name.
///
/// Names are not validated until resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Overrides {
    entries: BTreeMap<String, OverrideValue>,
}

impl Overrides {
    pub fn new() -> Self {
        Overrides::default()
    }

    /// Add or replace an override.
    pub fn set(mut self, name: impl Into<String>, value: impl Into<OverrideValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<OverrideValue>) {
        self.entries.insert(name.into(), value.into());
    }

    /// Parse a `FLAG=VALUE` assignment. A CMake type suffix
    /// (`FLAG:BOOL=ON`) is accepted and dropped.
    pub fn parse_assignment(assignment: &str) -> Result<(String, OverrideValue)> {
        let (name, value) = assignment
            .split_once('=')
            .with_context(|| format!("invalid override `{}`, expected FLAG=VALUE", assignment))?;

        let name = name.split_once(':').map_or(name, |(n, _)| n).trim();
        anyhow::ensure!(
            !name.is_empty(),
            "invalid override `{}`, missing flag name",
            assignment
        );

        Ok((name.to_string(), OverrideValue::Text(value.trim().to_string())))
    }

    /// Apply every entry of `other` on top of `self` (other takes precedence).
    pub fn merge(&mut self, other: &Overrides) {
        for (name, value) in &other.entries {
            self.entries.insert(name.clone(), value.clone());
        }
    }

    pub fn get(&self, name: &str) -> Option<&OverrideValue> {
        self.entries.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &OverrideValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<OverrideValue>> FromIterator<(K, V)> for Overrides {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut overrides = Overrides::new();
        for (k, v) in iter {
            overrides.insert(k, v);
        }
        overrides
    }
}

/// A fully validated build configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedConfiguration {
    platform: Platform,
    backend: Backend,
    flag_set: FlagSet,
    install_prefix: Option<PathBuf>,
    link_mode: LinkMode,
}

impl ResolvedConfiguration {
    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn backend(&self) -> Backend {
        self.backend
    }

    pub fn flag_set(&self) -> &FlagSet {
        &self.flag_set
    }

    pub fn install_prefix(&self) -> Option<&Path> {
        self.install_prefix.as_deref()
    }

    pub fn link_mode(&self) -> LinkMode {
        self.link_mode
    }

    /// Shorthand for a boolean flag.
    pub fn enabled(&self, id: FlagId) -> bool {
        self.flag_set.get_bool(id)
    }

    /// Flags that differ from the registry defaults, as overrides.
    pub fn overrides(&self) -> Overrides {
        self.flag_set
            .diff(&FlagRegistry::global().defaults())
            .iter()
            .map(|(id, value)| (id.as_str(), value.to_override()))
            .collect()
    }
}

/// The serialized form of a configuration as read back from disk.
///
/// Loading always goes through the resolver again, so a hand-edited
/// document can never bypass validation.
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigDocument {
    pub platform: Platform,
    pub backend: Backend,
    #[serde(default)]
    pub flag_set: Overrides,
}

impl ConfigDocument {
    pub fn from_json(contents: &str) -> Result<Self> {
        serde_json::from_str(contents).context("failed to parse resolved configuration")
    }

    /// Re-resolve the document.
    pub fn resolve(
        &self,
        resolver: &ConfigurationResolver<'_>,
    ) -> Result<Resolution, ResolveError> {
        resolver.resolve(self.platform, self.backend, &self.flag_set)
    }
}

/// A successful resolution: the configuration plus any advisories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolution {
    pub config: ResolvedConfiguration,
    pub advisories: Vec<Advisory>,
}

impl Resolution {
    pub fn has_advisories(&self) -> bool {
        !self.advisories.is_empty()
    }
}

/// Symbols the manual Makefile reads instead of the CMake flags.
const MANUAL_IGNORED: [FlagId; 4] = [
    FlagId::BuildCodec,
    FlagId::BuildJp3d,
    FlagId::BuildJpwl,
    FlagId::BuildMj2,
];

const MANUAL_SYMBOLS: [FlagId; 2] = [FlagId::WithJp3d, FlagId::WithJpwl];

/// Validates overrides against platform and backend constraints.
#[derive(Debug, Clone, Copy)]
pub struct ConfigurationResolver<'r> {
    registry: &'r FlagRegistry,
}

impl Default for ConfigurationResolver<'static> {
    fn default() -> Self {
        ConfigurationResolver::new()
    }
}

impl ConfigurationResolver<'static> {
    /// A resolver over the global registry.
    pub fn new() -> Self {
        ConfigurationResolver {
            registry: FlagRegistry::global(),
        }
    }
}

impl<'r> ConfigurationResolver<'r> {
    pub fn with_registry(registry: &'r FlagRegistry) -> Self {
        ConfigurationResolver { registry }
    }

    pub fn registry(&self) -> &'r FlagRegistry {
        self.registry
    }

    /// Resolve a configuration request.
    ///
    /// Deterministic: identical inputs give an identical result.
    pub fn resolve(
        &self,
        platform: Platform,
        backend: Backend,
        overrides: &Overrides,
    ) -> Result<Resolution, ResolveError> {
        tracing::debug!("resolving configuration for {} / {}", platform, backend);

        let (flag_set, explicit) = self.apply_overrides(overrides)?;

        if !backend.supports(platform) {
            return Err(ResolveError::BackendPlatformMismatch { backend, platform });
        }

        if flag_set.get_bool(FlagId::BuildIndexerJpip) && platform != Platform::WindowsNative {
            return Err(ResolveError::PlatformFlagMismatch {
                flag: FlagId::BuildIndexerJpip.to_string(),
                platform,
                required: Platform::WindowsNative,
            });
        }

        let data_root = flag_set.get_path(FlagId::Jpeg2000ConformanceDataRoot);
        if flag_set.get_bool(FlagId::BuildTesting) && data_root.is_none() {
            return Err(ResolveError::MissingRequiredFlag {
                flag: FlagId::Jpeg2000ConformanceDataRoot.to_string(),
                required_by: FlagId::BuildTesting.to_string(),
            });
        }

        let advisories = collect_advisories(platform, backend, &flag_set, &explicit);
        for advisory in &advisories {
            tracing::debug!("advisory: {}", advisory);
        }

        let link_mode = if flag_set.get_bool(FlagId::BuildSharedLibs) {
            LinkMode::Shared
        } else {
            LinkMode::Static
        };

        let install_prefix = flag_set
            .get_path(FlagId::CmakeInstallPrefix)
            .map(Path::to_path_buf);

        Ok(Resolution {
            config: ResolvedConfiguration {
                platform,
                backend,
                flag_set,
                install_prefix,
                link_mode,
            },
            advisories,
        })
    }

    /// Overlay overrides on the defaults. Returns the merged set and the
    /// flags whose value was changed from the default.
    fn apply_overrides(
        &self,
        overrides: &Overrides,
    ) -> Result<(FlagSet, BTreeSet<FlagId>), ResolveError> {
        let mut flag_set = self.registry.defaults();
        let mut explicit = BTreeSet::new();

        for (name, raw) in overrides.iter() {
            let flag = self.registry.lookup(name)?;
            let value = flag
                .kind
                .coerce(raw)
                .ok_or_else(|| ResolveError::TypeMismatch {
                    flag: flag.name().to_string(),
                    expected: flag.kind.name(),
                    found: raw.describe(),
                    allowed: match flag.kind {
                        FlagKind::Enum(choices) => {
                            choices.iter().map(|c| c.to_string()).collect()
                        }
                        _ => Vec::new(),
                    },
                })?;

            if flag.default.as_ref() != Some(&value) {
                explicit.insert(flag.id);
            }
            flag_set.insert(flag.id, value);
        }

        Ok((flag_set, explicit))
    }
}

fn collect_advisories(
    platform: Platform,
    backend: Backend,
    flag_set: &FlagSet,
    explicit: &BTreeSet<FlagId>,
) -> Vec<Advisory> {
    let mut advisories = Vec::new();

    match backend {
        Backend::ManualMakefile => {
            for flag in MANUAL_IGNORED {
                if explicit.contains(&flag) {
                    advisories.push(Advisory::IgnoredUnderManualMakefile { flag });
                }
            }
            if !flag_set.get_bool(FlagId::WithJpwl) && !flag_set.get_bool(FlagId::WithJp3d) {
                advisories.push(Advisory::ManualTargetingRequired);
            }
        }
        Backend::Autotools | Backend::CMake => {
            for flag in MANUAL_SYMBOLS {
                if explicit.contains(&flag) {
                    advisories.push(Advisory::ManualSymbolIgnored { flag, backend });
                }
            }
        }
    }

    if flag_set.contains(FlagId::CmakeOsxArchitectures)
        && !(platform == Platform::MacOS && backend == Backend::CMake)
    {
        advisories.push(Advisory::OsxArchitecturesIgnored { platform, backend });
    }

    advisories
}
