//! `jp2build matrix` command
//!
//! Resolves one set of overrides for every platform/backend pair. The
//! matrix is informational, so individual failures do not fail the command.

use anyhow::Result;

use super::{parse_overrides, Outcome, Session};
use crate::cli::{Format, MatrixArgs};
use jp2build::resolver::{resolve_matrix, MatrixRow};
use jp2build::ConfigurationResolver;

pub fn execute(session: &Session, args: MatrixArgs) -> Result<Outcome> {
    let mut overrides = session.config.flags.clone();
    overrides.merge(&parse_overrides(&args.set)?);

    let resolver = ConfigurationResolver::new();
    let rows: Vec<MatrixRow> = resolve_matrix(&resolver, &overrides)
        .iter()
        .map(|entry| entry.row())
        .collect();

    match args.format {
        Format::Json => println!("{}", serde_json::to_string_pretty(&rows)?),
        Format::Text => {
            for row in &rows {
                let detail = match &row.error {
                    Some(err) => err.clone(),
                    None => row.advisories.join("; "),
                };
                println!(
                    "{:<11} {:<10} {:<9} {}",
                    row.platform.as_str(),
                    row.backend.as_str(),
                    row.status,
                    detail
                );
            }
        }
    }

    Ok(Outcome::Success)
}
