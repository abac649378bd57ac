//! Configuration file support.
//!
//! Two locations are read:
//! - Global: `~/.jp2build/config.toml` - user-wide defaults
//! - Project: `.jp2build/config.toml` - overrides for one source tree
//!
//! Project config takes precedence over global config, and command-line
//! arguments take precedence over both.

use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::core::{Backend, Platform};
use crate::resolver::Overrides;

/// jp2build configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Default platform and backend
    pub defaults: DefaultsConfig,

    /// Flag overrides applied before `--set`
    pub flags: Overrides,

    /// Rendering settings
    pub build: BuildConfig,

    /// Install settings
    pub install: InstallConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultsConfig {
    /// unix, macos, win-cygwin, win-native
    pub platform: Option<String>,

    /// autotools, cmake, manual
    pub backend: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Parallel jobs for build steps
    pub jobs: Option<NonZeroUsize>,

    /// CMake generator
    pub generator: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InstallConfig {
    /// Privilege-escalation wrapper, e.g. `["su", "-c"]`
    pub wrapper: Option<Vec<String>>,
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Load configuration, or defaults if the file doesn't exist. A file
    /// that exists but does not parse is an error.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: Config) {
        if other.defaults.platform.is_some() {
            self.defaults.platform = other.defaults.platform;
        }
        if other.defaults.backend.is_some() {
            self.defaults.backend = other.defaults.backend;
        }

        self.flags.merge(&other.flags);

        if other.build.jobs.is_some() {
            self.build.jobs = other.build.jobs;
        }
        if other.build.generator.is_some() {
            self.build.generator = other.build.generator;
        }

        if other.install.wrapper.is_some() {
            self.install.wrapper = other.install.wrapper;
        }
    }

    /// Parse the default platform.
    pub fn platform(&self) -> Result<Option<Platform>> {
        self.defaults
            .platform
            .as_deref()
            .map(str::parse::<Platform>)
            .transpose()
            .context("invalid `defaults.platform` in config")
    }

    /// Parse the default backend.
    pub fn backend(&self) -> Result<Option<Backend>> {
        self.defaults
            .backend
            .as_deref()
            .map(str::parse::<Backend>)
            .transpose()
            .context("invalid `defaults.backend` in config")
    }
}

/// Get the global config directory (~/.jp2build).
pub fn global_config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(".jp2build"))
}

/// Get the global config path (~/.jp2build/config.toml).
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("config.toml"))
}

/// Get the project config path (.jp2build/config.toml).
pub fn project_config_path(project_root: &Path) -> PathBuf {
    project_root.join(".jp2build").join("config.toml")
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (.jp2build/config.toml)
/// 2. Global config (~/.jp2build/config.toml)
/// 3. Defaults
pub fn load_config(global_path: Option<&Path>, project_path: &Path) -> Result<Config> {
    let mut config = Config::default();

    if let Some(global_path) = global_path {
        config.merge(Config::load_or_default(global_path)?);
    }

    config.merge(Config::load_or_default(project_path)?);

    Ok(config)
}
