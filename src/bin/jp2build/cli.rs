//! CLI definitions using clap.

use std::num::NonZeroUsize;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

use jp2build::{Backend, Platform};

/// jp2build - decide how the OpenJPEG codec project should be built
#[derive(Parser)]
#[command(name = "jp2build")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Read configuration from this file instead of the default locations
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate a configuration request and print the resolved configuration
    Resolve(ResolveArgs),

    /// Print the ordered list of build targets
    Plan(PlanArgs),

    /// Print the step sequence a backend would run
    Render(RenderArgs),

    /// List recognized flags and their defaults
    Flags(FlagsArgs),

    /// Resolve the same overrides for every platform/backend pair
    Matrix(MatrixArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum Format {
    #[default]
    Text,
    Json,
}

/// What to resolve: either an explicit request or a saved configuration.
#[derive(Args, Debug)]
pub struct RequestArgs {
    /// Target platform (unix, macos, win-cygwin, win-native)
    #[arg(long)]
    pub platform: Option<Platform>,

    /// Build backend (autotools, cmake, manual)
    #[arg(long)]
    pub backend: Option<Backend>,

    /// Override a flag (FLAG=VALUE, may be repeated)
    #[arg(long = "set", value_name = "FLAG=VALUE")]
    pub set: Vec<String>,

    /// Load a configuration written by `resolve --format json`
    #[arg(long, value_name = "PATH", conflicts_with = "platform")]
    pub from: Option<PathBuf>,
}

/// Override the Doxygen probe.
#[derive(Args, Debug)]
pub struct DoxygenArgs {
    /// Treat Doxygen as available
    #[arg(long, conflicts_with = "no_doxygen")]
    pub doxygen: bool,

    /// Treat Doxygen as unavailable
    #[arg(long)]
    pub no_doxygen: bool,
}

#[derive(Args, Debug)]
pub struct ResolveArgs {
    #[command(flatten)]
    pub request: RequestArgs,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Text)]
    pub format: Format,
}

#[derive(Args, Debug)]
pub struct PlanArgs {
    #[command(flatten)]
    pub request: RequestArgs,

    #[command(flatten)]
    pub doxygen: DoxygenArgs,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Text)]
    pub format: Format,
}

#[derive(Args, Debug)]
pub struct RenderArgs {
    #[command(flatten)]
    pub request: RequestArgs,

    #[command(flatten)]
    pub doxygen: DoxygenArgs,

    /// Number of parallel jobs for build steps
    #[arg(short, long)]
    pub jobs: Option<NonZeroUsize>,

    /// CMake generator
    #[arg(short = 'G', long)]
    pub generator: Option<String>,

    /// Privilege-escalation wrapper for install steps (e.g. "su -c")
    #[arg(long, value_name = "CMD")]
    pub wrapper: Option<String>,

    /// Source directory passed to the configure step
    #[arg(long, default_value = ".")]
    pub source_dir: PathBuf,

    /// Walk the steps through a logging toolchain instead of printing them
    #[arg(long)]
    pub dry_run: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Text)]
    pub format: Format,
}

#[derive(Args, Debug)]
pub struct FlagsArgs {
    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Text)]
    pub format: Format,
}

#[derive(Args, Debug)]
pub struct MatrixArgs {
    /// Override a flag (FLAG=VALUE, may be repeated)
    #[arg(long = "set", value_name = "FLAG=VALUE")]
    pub set: Vec<String>,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Text)]
    pub format: Format,
}

#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}
