//! jp2build - build-configuration model for the OpenJPEG codec project
//!
//! Given a platform, a build backend and a set of flag overrides, this crate
//! decides whether the configuration is legal, which artifacts it produces
//! and in what order, and what each backend would do to build them. It never
//! runs a compiler: rendered steps are handed to a [`builder::Toolchain`]
//! supplied by the caller.
//!
//! ```
//! use jp2build::{Backend, ConfigurationResolver, Overrides, Platform};
//! use jp2build::builder::{render, HostCapabilities, RenderOptions, TargetPlanner};
//!
//! let resolution = ConfigurationResolver::new()
//!     .resolve(Platform::Unix, Backend::CMake, &Overrides::new().set("BUILD_MJ2", true))
//!     .unwrap();
//! let plan = TargetPlanner::new(HostCapabilities::default())
//!     .plan(&resolution.config)
//!     .unwrap();
//! let steps = render(Backend::CMake, &resolution.config, &plan.targets, &RenderOptions::default())
//!     .unwrap();
//! assert!(!steps.is_empty());
//! ```

pub mod builder;
pub mod core;
pub mod resolver;
pub mod util;

pub use crate::core::{
    Backend, BuildTarget, Flag, FlagId, FlagKind, FlagRegistry, FlagSet, FlagValue,
    OverrideValue, Platform, TargetKind,
};

pub use resolver::{
    Advisory, ConfigurationResolver, LinkMode, Overrides, Resolution, ResolveError,
    ResolvedConfiguration,
};
