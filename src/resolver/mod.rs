//! Configuration resolution: overrides in, validated configuration out.

pub mod advisory;
pub mod errors;
pub mod matrix;
pub mod resolve;

pub use advisory::Advisory;
pub use errors::ResolveError;
pub use matrix::{resolve_matrix, MatrixEntry, MatrixRow};
pub use resolve::{
    ConfigDocument, ConfigurationResolver, LinkMode, Overrides, Resolution, ResolvedConfiguration,
};
