//! `jp2build render` command

use std::num::NonZeroUsize;

use anyhow::Result;

use super::{host_capabilities, Outcome, Session};
use crate::cli::{Format, RenderArgs};
use jp2build::builder::render::{render, RenderOptions, Step};
use jp2build::builder::{execute_steps, DryRunToolchain, TargetPlanner};
use jp2build::util::probe;
use jp2build::Platform;

pub fn execute(session: &Session, args: RenderArgs) -> Result<Outcome> {
    let resolution = session.resolve(&args.request)?;
    let config = &resolution.config;
    let planner = TargetPlanner::new(host_capabilities(&args.doxygen));
    let plan = planner.plan(config)?;

    let build = &session.config.build;
    let options = RenderOptions {
        source_dir: args.source_dir,
        jobs: args.jobs.or(build.jobs).map(NonZeroUsize::get),
        escalation: args
            .wrapper
            .map(|w| w.split_whitespace().map(String::from).collect())
            .or_else(|| session.config.install.wrapper.clone()),
        generator: args.generator.or_else(|| build.generator.clone()),
        mingw_make: config.platform() == Platform::WindowsNative && probe::mingw_make_available(),
    };

    let steps = render(config.backend(), config, &plan.targets, &options)?;

    if args.dry_run {
        let outcomes = execute_steps(&steps, &DryRunToolchain)?;
        tracing::info!("dry run finished {} step(s)", outcomes.len());
    } else {
        match args.format {
            Format::Json => println!("{}", serde_json::to_string_pretty(&steps)?),
            Format::Text => print_steps(&steps),
        }
    }

    let mut advisories = resolution.advisories;
    advisories.extend(plan.advisories);
    Ok(session.report(&advisories))
}

fn print_steps(steps: &[Step]) {
    for (i, step) in steps.iter().enumerate() {
        let elevation = if step.requires_elevation {
            "  (requires elevation)"
        } else {
            ""
        };
        println!(
            "{:>3}. [{}] {}{}",
            i + 1,
            step.kind.as_str(),
            step.display_command(),
            elevation
        );
    }
}
