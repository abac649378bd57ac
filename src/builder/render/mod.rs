//! Backend rendering.
//!
//! Translates a resolved configuration and its target plan into the abstract
//! step sequence a backend would run. Nothing is executed here; see
//! [`crate::builder::executor`] for driving a toolchain.

pub mod autotools;
pub mod cmake;
pub mod manual;

use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

use crate::core::{Backend, BuildTarget, Platform, TargetKind};
use crate::resolver::ResolvedConfiguration;

/// The kind of an abstract build step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    Configure,
    Build,
    DocsBuild,
    Test,
    Install,
    Clean,
    /// Autotools only; removes everything `Clean` does plus configure output
    DistClean,
    /// Manual Makefile only
    Uninstall,
}

impl StepKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StepKind::Configure => "configure",
            StepKind::Build => "build",
            StepKind::DocsBuild => "docs-build",
            StepKind::Test => "test",
            StepKind::Install => "install",
            StepKind::Clean => "clean",
            StepKind::DistClean => "distclean",
            StepKind::Uninstall => "uninstall",
        }
    }
}

impl std::fmt::Display for StepKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single step of a backend's execution model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Step {
    pub kind: StepKind,

    /// Informational command line; never run by this crate
    pub command: Vec<String>,

    /// Whether the step needs elevated privileges to run
    pub requires_elevation: bool,
}

impl Step {
    pub fn new<I, S>(kind: StepKind, command: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Step {
            kind,
            command: command.into_iter().map(Into::into).collect(),
            requires_elevation: false,
        }
    }

    /// A step that writes outside the build tree. With an escalation
    /// wrapper the command is prefixed with it and no further elevation
    /// is required.
    pub fn privileged<I, S>(kind: StepKind, command: I, options: &RenderOptions) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut step = Step::new(kind, command);
        match options.escalation {
            Some(ref wrapper) => {
                let mut wrapped = wrapper.clone();
                wrapped.append(&mut step.command);
                step.command = wrapped;
            }
            None => step.requires_elevation = true,
        }
        step
    }

    /// Append `-j N` when a job count is configured.
    fn with_jobs(mut self, jobs: Option<usize>) -> Self {
        if let Some(jobs) = jobs {
            self.command.push(format!("-j{}", jobs));
        }
        self
    }

    /// Command line joined for display.
    pub fn display_command(&self) -> String {
        self.command
            .iter()
            .map(|arg| {
                if arg.contains(' ') {
                    format!("\"{}\"", arg)
                } else {
                    arg.clone()
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Knobs that shape rendering but not legality.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Source tree the configure step points at
    pub source_dir: PathBuf,

    /// Parallel jobs for build steps
    pub jobs: Option<usize>,

    /// Privilege-escalation wrapper (e.g. `["su", "-c"]`)
    pub escalation: Option<Vec<String>>,

    /// CMake generator; chosen from the platform when absent
    pub generator: Option<String>,

    /// Whether `mingw32-make` is available on native Windows
    pub mingw_make: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions {
            source_dir: PathBuf::from("."),
            jobs: None,
            escalation: None,
            generator: None,
            mingw_make: false,
        }
    }
}

/// Error during rendering.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RenderError {
    #[error("configuration was resolved for `{configured}`, cannot render it for `{requested}`")]
    BackendMismatch {
        requested: Backend,
        configured: Backend,
    },
}

/// Render the step sequence `backend` would perform.
pub fn render(
    backend: Backend,
    config: &ResolvedConfiguration,
    targets: &[BuildTarget],
    options: &RenderOptions,
) -> Result<Vec<Step>, RenderError> {
    if backend != config.backend() {
        return Err(RenderError::BackendMismatch {
            requested: backend,
            configured: config.backend(),
        });
    }

    let steps = match backend {
        Backend::Autotools => autotools::render(config, targets, options),
        Backend::CMake => cmake::render(config, targets, options),
        Backend::ManualMakefile => manual::render(config, targets, options),
    };

    tracing::debug!("rendered {} step(s) for {}", steps.len(), backend);
    Ok(steps)
}

fn has_kind(targets: &[BuildTarget], kind: TargetKind) -> bool {
    targets.iter().any(|t| t.kind == kind)
}

/// The make program for plain Makefile flows.
fn make_program(platform: Platform, options: &RenderOptions) -> &'static str {
    if platform == Platform::WindowsNative && options.mingw_make {
        "mingw32-make"
    } else {
        "make"
    }
}
