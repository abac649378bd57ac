//! Driving an external toolchain through rendered steps.
//!
//! The toolchain is a collaborator: it receives each step and reports
//! success or failure plus arbitrary diagnostic text, which is carried
//! through but never interpreted.

use thiserror::Error;

use crate::builder::render::{Step, StepKind};

/// Result of running one step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepOutcome {
    pub success: bool,
    pub diagnostics: String,
}

impl StepOutcome {
    pub fn ok() -> Self {
        StepOutcome {
            success: true,
            diagnostics: String::new(),
        }
    }

    pub fn failed(diagnostics: impl Into<String>) -> Self {
        StepOutcome {
            success: false,
            diagnostics: diagnostics.into(),
        }
    }
}

/// Something that can carry out a step.
pub trait Toolchain {
    fn execute(&self, step: &Step) -> StepOutcome;
}

/// Logs every step and reports success without running anything.
#[derive(Debug, Default, Clone, Copy)]
pub struct DryRunToolchain;

impl Toolchain for DryRunToolchain {
    fn execute(&self, step: &Step) -> StepOutcome {
        if step.requires_elevation {
            tracing::info!("[{}] (elevated) {}", step.kind, step.display_command());
        } else {
            tracing::info!("[{}] {}", step.kind, step.display_command());
        }
        StepOutcome::ok()
    }
}

/// A step failed; later steps were not attempted.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("step {index} ({kind}) failed")]
pub struct ExecuteError {
    /// Zero-based position in the sequence
    pub index: usize,
    pub kind: StepKind,
    pub diagnostics: String,
    /// Outcomes of the steps that ran before the failure
    pub completed: Vec<StepOutcome>,
}

/// Run steps in order, stopping at the first failure.
pub fn execute_steps(
    steps: &[Step],
    toolchain: &dyn Toolchain,
) -> Result<Vec<StepOutcome>, ExecuteError> {
    let mut completed = Vec::with_capacity(steps.len());

    for (index, step) in steps.iter().enumerate() {
        let outcome = toolchain.execute(step);
        if !outcome.success {
            tracing::debug!("step {} ({}) failed", index, step.kind);
            return Err(ExecuteError {
                index,
                kind: step.kind,
                diagnostics: outcome.diagnostics,
                completed,
            });
        }
        completed.push(outcome);
    }

    Ok(completed)
}
