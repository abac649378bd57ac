//! `jp2build flags` command

use anyhow::Result;
use serde::Serialize;

use super::Outcome;
use crate::cli::{FlagsArgs, Format};
use jp2build::{FlagKind, FlagRegistry};

#[derive(Serialize)]
struct FlagRow {
    name: &'static str,
    kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    default: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    allowed: Vec<&'static str>,
    description: &'static str,
}

pub fn execute(args: FlagsArgs) -> Result<Outcome> {
    let rows: Vec<FlagRow> = FlagRegistry::global()
        .iter()
        .map(|flag| FlagRow {
            name: flag.name(),
            kind: flag.kind.name(),
            default: flag.default.as_ref().map(|v| v.render()),
            allowed: match flag.kind {
                FlagKind::Enum(values) => values.to_vec(),
                _ => Vec::new(),
            },
            description: flag.description,
        })
        .collect();

    match args.format {
        Format::Json => println!("{}", serde_json::to_string_pretty(&rows)?),
        Format::Text => {
            for row in &rows {
                let default = row.default.as_deref().unwrap_or("-");
                println!(
                    "{:<24} {:<8} {:<12} {}",
                    row.name, row.kind, default, row.description
                );
                if !row.allowed.is_empty() {
                    println!("{:<24} one of: {}", "", row.allowed.join(", "));
                }
            }
        }
    }

    Ok(Outcome::Success)
}
