//! Build targets produced by the planner.

use std::collections::BTreeSet;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// The kind of artifact a target produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetKind {
    Library,
    Executable,
    Docs,
    /// Synthetic conformance-test target
    Test,
}

impl TargetKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetKind::Library => "library",
            TargetKind::Executable => "executable",
            TargetKind::Docs => "docs",
            TargetKind::Test => "test",
        }
    }

    /// Whether the target is compiled (as opposed to generated or run).
    pub fn is_compiled(&self) -> bool {
        matches!(self, TargetKind::Library | TargetKind::Executable)
    }
}

impl std::fmt::Display for TargetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single buildable artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildTarget {
    /// Artifact name (unique within a plan)
    pub name: String,

    pub kind: TargetKind,

    /// Derived from the flag set; the planner only emits enabled targets
    pub enabled: bool,

    /// Names of targets that must be built first
    pub depends_on: BTreeSet<String>,

    /// Inputs outside the build tree (e.g. conformance data)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub external_inputs: Vec<PathBuf>,
}

impl BuildTarget {
    pub fn new(name: impl Into<String>, kind: TargetKind) -> Self {
        BuildTarget {
            name: name.into(),
            kind,
            enabled: true,
            depends_on: BTreeSet::new(),
            external_inputs: Vec::new(),
        }
    }

    pub fn library(name: impl Into<String>) -> Self {
        BuildTarget::new(name, TargetKind::Library)
    }

    pub fn executable(name: impl Into<String>) -> Self {
        BuildTarget::new(name, TargetKind::Executable)
    }

    /// Add a dependency on another target.
    pub fn depends_on(mut self, name: impl Into<String>) -> Self {
        self.depends_on.insert(name.into());
        self
    }

    /// Add an input that lives outside the build tree.
    pub fn with_input(mut self, path: impl Into<PathBuf>) -> Self {
        self.external_inputs.push(path.into());
        self
    }
}
