//! jp2build CLI - build-configuration model for the OpenJPEG codec project

use std::io::IsTerminal;

use anyhow::Result;
use clap::error::ErrorKind;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use jp2build::util::diagnostic;
use jp2build::ResolveError;

mod cli;
mod commands;

use cli::{Cli, Commands};
use commands::{Outcome, Session};

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => e.exit(),
            // Exit code 2 means "advisories only", so usage errors exit 1.
            _ => {
                let _ = e.print();
                std::process::exit(1);
            }
        },
    };

    let color = !cli.no_color && std::io::stderr().is_terminal();

    let filter = if cli.verbose {
        EnvFilter::new("jp2build=debug")
    } else {
        EnvFilter::new("jp2build=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .with_ansi(color)
        .init();

    match run(cli, color) {
        Ok(Outcome::Success) => {}
        // Advisories were printed as warnings; the output is still valid.
        Ok(Outcome::Advisory) => std::process::exit(2),
        Err(e) => {
            report(&e, color);
            std::process::exit(1);
        }
    }
}

fn run(cli: Cli, color: bool) -> Result<Outcome> {
    let session = Session::new(cli.config.as_deref(), color)?;

    match cli.command {
        Commands::Resolve(args) => commands::resolve::execute(&session, args),
        Commands::Plan(args) => commands::plan::execute(&session, args),
        Commands::Render(args) => commands::render::execute(&session, args),
        Commands::Flags(args) => commands::flags::execute(args),
        Commands::Matrix(args) => commands::matrix::execute(&session, args),
        Commands::Completions(args) => commands::completions::execute(args),
    }
}

fn report(err: &anyhow::Error, color: bool) {
    match err.downcast_ref::<ResolveError>() {
        Some(resolve_err) => diagnostic::emit(&resolve_err.to_diagnostic(), color),
        None => eprintln!("error: {:#}", err),
    }
}
