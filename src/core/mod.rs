//! Core data model: flags, platforms, backends and targets.

pub mod backend;
pub mod flag;
pub mod flag_set;
pub mod platform;
pub mod registry;
pub mod target;

pub use backend::{Backend, BackendParseError};
pub use flag::{Flag, FlagId, FlagKind, FlagValue, OverrideValue};
pub use flag_set::FlagSet;
pub use platform::{Platform, PlatformParseError};
pub use registry::FlagRegistry;
pub use target::{BuildTarget, TargetKind};
