//! Build planning and backend rendering.
//!
//! The pipeline is: resolved configuration -> [`plan::TargetPlanner`] ->
//! [`render::render`] -> optional [`executor::execute_steps`] against a
//! toolchain.

pub mod executor;
pub mod plan;
pub mod render;

pub use executor::{execute_steps, DryRunToolchain, ExecuteError, StepOutcome, Toolchain};
pub use plan::{HostCapabilities, Plan, PlanError, TargetPlanner};
pub use render::{render, RenderError, RenderOptions, Step, StepKind};
