//! Top-level Makefile with a hand-edited `opj_config.h`.

use crate::core::{BuildTarget, FlagId, TargetKind};
use crate::resolver::ResolvedConfiguration;

use super::{has_kind, make_program, RenderOptions, Step, StepKind};

/// Makefile symbols and the subdirectory each one pulls in.
const SUBDIRS: [(FlagId, &str); 2] = [(FlagId::WithJpwl, "jpwl"), (FlagId::WithJp3d, "jp3d")];

pub fn render(
    config: &ResolvedConfiguration,
    targets: &[BuildTarget],
    options: &RenderOptions,
) -> Vec<Step> {
    let make = make_program(config.platform(), options);
    let mut steps = Vec::new();

    let mut configure = vec!["edit".to_string(), "opj_config.h".to_string()];
    for (flag, _) in SUBDIRS {
        let value = if config.enabled(flag) { "yes" } else { "no" };
        configure.push(format!("{}={}", flag, value));
    }
    steps.push(Step::new(StepKind::Configure, configure));

    steps.push(Step::new(StepKind::Build, [make]).with_jobs(options.jobs));
    for (flag, dir) in SUBDIRS {
        if config.enabled(flag) {
            steps.push(Step::new(StepKind::Build, [make, "-C", dir]).with_jobs(options.jobs));
        }
    }

    if has_kind(targets, TargetKind::Docs) {
        steps.push(Step::new(StepKind::DocsBuild, ["doxygen", "doc/Doxyfile.dox"]));
    }

    let mut install = vec![make.to_string(), "install".to_string()];
    if let Some(prefix) = config.install_prefix() {
        install.push(format!("prefix={}", prefix.display()));
    }
    steps.push(Step::privileged(StepKind::Install, install, options));

    steps.push(Step::new(StepKind::Clean, [make, "clean"]));
    steps.push(Step::privileged(StepKind::Uninstall, [make, "uninstall"], options));

    steps
}
