//! `jp2build plan` command

use anyhow::Result;

use super::{host_capabilities, Outcome, Session};
use crate::cli::{Format, PlanArgs};
use jp2build::builder::{Plan, TargetPlanner};

pub fn execute(session: &Session, args: PlanArgs) -> Result<Outcome> {
    let resolution = session.resolve(&args.request)?;
    let planner = TargetPlanner::new(host_capabilities(&args.doxygen));
    let plan = planner.plan(&resolution.config)?;

    match args.format {
        Format::Json => println!("{}", serde_json::to_string_pretty(&plan.targets)?),
        Format::Text => print_plan(&plan),
    }

    let mut advisories = resolution.advisories;
    advisories.extend(plan.advisories);
    Ok(session.report(&advisories))
}

fn print_plan(plan: &Plan) {
    for (i, target) in plan.targets.iter().enumerate() {
        if target.depends_on.is_empty() {
            println!("{:>3}. {} ({})", i + 1, target.name, target.kind);
        } else {
            let deps: Vec<&str> = target.depends_on.iter().map(String::as_str).collect();
            println!(
                "{:>3}. {} ({}) <- {}",
                i + 1,
                target.name,
                target.kind,
                deps.join(", ")
            );
        }
    }
}
