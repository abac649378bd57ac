//! Command implementations

pub mod completions;
pub mod flags;
pub mod matrix;
pub mod plan;
pub mod render;
pub mod resolve;

use std::path::Path;

use anyhow::{bail, Context, Result};

use crate::cli::{DoxygenArgs, RequestArgs};
use jp2build::builder::HostCapabilities;
use jp2build::resolver::{Advisory, ConfigDocument};
use jp2build::util::config::{global_config_path, load_config, project_config_path};
use jp2build::util::{diagnostic, probe, Config};
use jp2build::{ConfigurationResolver, Overrides, Resolution};

/// How a command finished when it did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    /// Output is valid but advisories were reported.
    Advisory,
}

impl Outcome {
    fn from_advisories(advisories: &[Advisory]) -> Self {
        if advisories.is_empty() {
            Outcome::Success
        } else {
            Outcome::Advisory
        }
    }
}

/// State shared by every command.
pub struct Session {
    pub config: Config,
    pub color: bool,
}

impl Session {
    pub fn new(config_path: Option<&Path>, color: bool) -> Result<Self> {
        let config = match config_path {
            Some(path) => Config::load(path)?,
            None => {
                let cwd = std::env::current_dir().context("no current directory")?;
                load_config(global_config_path().as_deref(), &project_config_path(&cwd))?
            }
        };
        Ok(Session { config, color })
    }

    /// Resolve a request from the command line, a saved document, or
    /// config defaults, in that order.
    pub fn resolve(&self, request: &RequestArgs) -> Result<Resolution> {
        let resolver = ConfigurationResolver::new();
        let cli_overrides = parse_overrides(&request.set)?;

        if let Some(path) = &request.from {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            let mut document = ConfigDocument::from_json(&contents)
                .with_context(|| format!("failed to load {}", path.display()))?;
            if let Some(backend) = request.backend {
                if backend != document.backend {
                    bail!(
                        "`--backend {}` does not match backend `{}` saved in {}",
                        backend,
                        document.backend,
                        path.display()
                    );
                }
            }
            document.flag_set.merge(&cli_overrides);

            tracing::debug!("re-resolving {}", path.display());
            return Ok(document.resolve(&resolver)?);
        }

        let Some(platform) = request.platform.or(self.config.platform()?) else {
            bail!(
                "no platform given\nhelp: pass `--platform` or set `defaults.platform` in config"
            );
        };
        let Some(backend) = request.backend.or(self.config.backend()?) else {
            bail!("no backend given\nhelp: pass `--backend` or set `defaults.backend` in config");
        };

        let mut overrides = self.config.flags.clone();
        overrides.merge(&cli_overrides);

        tracing::debug!("resolving for {} with {}", platform, backend);
        Ok(resolver.resolve(platform, backend, &overrides)?)
    }

    pub fn report(&self, advisories: &[Advisory]) -> Outcome {
        for advisory in advisories {
            diagnostic::emit(&advisory.to_diagnostic(), self.color);
        }
        Outcome::from_advisories(advisories)
    }
}

pub fn parse_overrides(assignments: &[String]) -> Result<Overrides> {
    assignments
        .iter()
        .map(|a| Overrides::parse_assignment(a))
        .collect::<Result<Vec<_>>>()
        .map(|pairs| pairs.into_iter().collect())
}

/// Explicit flags win over the Doxygen probe.
pub fn host_capabilities(args: &DoxygenArgs) -> HostCapabilities {
    let doxygen = if args.doxygen {
        true
    } else if args.no_doxygen {
        false
    } else {
        probe::doxygen_available()
    };
    HostCapabilities { doxygen }
}
