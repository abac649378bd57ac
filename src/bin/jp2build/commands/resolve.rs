//! `jp2build resolve` command

use anyhow::Result;

use super::{Outcome, Session};
use crate::cli::{Format, ResolveArgs};
use jp2build::{FlagRegistry, ResolvedConfiguration};

pub fn execute(session: &Session, args: ResolveArgs) -> Result<Outcome> {
    let resolution = session.resolve(&args.request)?;

    match args.format {
        Format::Json => println!("{}", serde_json::to_string_pretty(&resolution.config)?),
        Format::Text => print_config(&resolution.config),
    }

    Ok(session.report(&resolution.advisories))
}

fn print_config(config: &ResolvedConfiguration) {
    println!("platform:       {}", config.platform());
    println!("backend:        {}", config.backend());
    println!("link mode:      {}", config.link_mode().as_str());
    match config.install_prefix() {
        Some(prefix) => println!("install prefix: {}", prefix.display()),
        None => println!("install prefix: (backend default)"),
    }

    println!("flags:");
    let defaults = FlagRegistry::global().defaults();
    for (id, value) in config.flag_set().iter() {
        let marker = if defaults.get(id) == Some(value) {
            ""
        } else {
            "  (set)"
        };
        println!("  {:<24} = {}{}", id.as_str(), value.render(), marker);
    }
}
