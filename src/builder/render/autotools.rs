//! `./configure && make` flow.

use crate::core::{BuildTarget, FlagId, TargetKind};
use crate::resolver::{LinkMode, ResolvedConfiguration};

use super::{has_kind, make_program, RenderOptions, Step, StepKind};

/// Feature switches understood by the configure script.
const FEATURES: [(FlagId, &str); 3] = [
    (FlagId::BuildJpwl, "--enable-jpwl"),
    (FlagId::BuildMj2, "--enable-mj2"),
    (FlagId::BuildJp3d, "--enable-jp3d"),
];

pub fn render(
    config: &ResolvedConfiguration,
    targets: &[BuildTarget],
    options: &RenderOptions,
) -> Vec<Step> {
    let make = make_program(config.platform(), options);
    let docs = has_kind(targets, TargetKind::Docs);
    let mut steps = Vec::new();

    steps.push(Step::new(StepKind::Configure, ["./bootstrap.sh"]));
    steps.push(Step::new(StepKind::Configure, configure_command(config, docs)));
    steps.push(Step::new(StepKind::Build, [make]).with_jobs(options.jobs));

    if docs {
        steps.push(Step::new(StepKind::DocsBuild, [make, "doc"]));
    }

    steps.push(Step::privileged(StepKind::Install, [make, "install"], options));
    steps.push(Step::new(StepKind::Clean, [make, "clean"]));
    steps.push(Step::new(StepKind::DistClean, [make, "distclean"]));

    steps
}

fn configure_command(config: &ResolvedConfiguration, docs: bool) -> Vec<String> {
    let mut cmd = vec!["./configure".to_string()];

    if let Some(prefix) = config.install_prefix() {
        cmd.push(format!("--prefix={}", prefix.display()));
    }

    match config.link_mode() {
        LinkMode::Shared => {
            cmd.push("--enable-shared".to_string());
            cmd.push("--disable-static".to_string());
        }
        LinkMode::Static => {
            cmd.push("--disable-shared".to_string());
            cmd.push("--enable-static".to_string());
        }
    }

    for (flag, switch) in FEATURES {
        if config.enabled(flag) {
            cmd.push(switch.to_string());
        }
    }

    if docs {
        cmd.push("--enable-doc".to_string());
    }

    cmd
}
