//! CMake flow.

use crate::core::{BuildTarget, FlagId, FlagRegistry, Platform, TargetKind};
use crate::resolver::ResolvedConfiguration;

use super::{has_kind, RenderOptions, Step, StepKind};

/// Flags that never reach the CMake cache.
const NOT_CACHED: [FlagId; 2] = [FlagId::WithJpwl, FlagId::WithJp3d];

/// What drives the build once CMake has generated the project.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BuildTool {
    Make(&'static str),
    NMake,
    /// `cmake --build .` for IDE and other generators
    CMakeBuild,
}

impl BuildTool {
    fn for_generator(generator: &str) -> Self {
        match generator {
            "Unix Makefiles" => BuildTool::Make("make"),
            "MinGW Makefiles" => BuildTool::Make("mingw32-make"),
            "NMake Makefiles" => BuildTool::NMake,
            _ => BuildTool::CMakeBuild,
        }
    }

    fn invoke(&self, target: Option<&str>, jobs: Option<usize>) -> Vec<String> {
        let mut cmd: Vec<String> = match self {
            BuildTool::Make(program) => vec![program.to_string()],
            BuildTool::NMake => vec!["nmake".to_string()],
            BuildTool::CMakeBuild => {
                vec!["cmake".to_string(), "--build".to_string(), ".".to_string()]
            }
        };

        if let Some(target) = target {
            if *self == BuildTool::CMakeBuild {
                cmd.push("--target".to_string());
            }
            cmd.push(target.to_string());
        }

        if let Some(jobs) = jobs {
            match self {
                BuildTool::Make(_) => cmd.push(format!("-j{}", jobs)),
                BuildTool::CMakeBuild => {
                    cmd.push("--parallel".to_string());
                    cmd.push(jobs.to_string());
                }
                // nmake has no parallel mode
                BuildTool::NMake => {}
            }
        }

        cmd
    }
}

pub fn render(
    config: &ResolvedConfiguration,
    targets: &[BuildTarget],
    options: &RenderOptions,
) -> Vec<Step> {
    let generator = generator(config.platform(), options);
    let tool = BuildTool::for_generator(&generator);
    let mut steps = Vec::new();

    steps.push(Step::new(
        StepKind::Configure,
        configure_command(config, &generator, options),
    ));
    steps.push(Step::new(StepKind::Build, tool.invoke(None, options.jobs)));

    if has_kind(targets, TargetKind::Docs) {
        steps.push(Step::new(StepKind::DocsBuild, tool.invoke(Some("doc"), None)));
    }

    if has_kind(targets, TargetKind::Test) {
        steps.push(Step::new(StepKind::Test, ["ctest", "--output-on-failure"]));
    }

    steps.push(Step::privileged(
        StepKind::Install,
        tool.invoke(Some("install"), None),
        options,
    ));
    steps.push(Step::new(StepKind::Clean, tool.invoke(Some("clean"), None)));

    steps
}

/// Pick the generator: explicit choice first, then the platform default.
pub fn generator(platform: Platform, options: &RenderOptions) -> String {
    if let Some(ref generator) = options.generator {
        return generator.clone();
    }
    match platform {
        Platform::WindowsNative if options.mingw_make => "MinGW Makefiles",
        Platform::WindowsNative => "NMake Makefiles",
        Platform::Unix | Platform::MacOS | Platform::WindowsCygwin => "Unix Makefiles",
    }
    .to_string()
}

fn configure_command(
    config: &ResolvedConfiguration,
    generator: &str,
    options: &RenderOptions,
) -> Vec<String> {
    let registry = FlagRegistry::global();
    let mut cmd = vec!["cmake".to_string(), "-G".to_string(), generator.to_string()];

    for (id, value) in config.flag_set().iter() {
        if NOT_CACHED.contains(&id) {
            continue;
        }
        if id == FlagId::CmakeOsxArchitectures && config.platform() != Platform::MacOS {
            continue;
        }
        let kind = registry.get(id).kind;
        cmd.push(format!("-D{}:{}={}", id, kind.cmake_type(), value.render()));
    }

    cmd.push(options.source_dir.display().to_string());
    cmd
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Backend;
    use crate::resolver::{ConfigurationResolver, Overrides};

    fn config(platform: Platform, overrides: Overrides) -> ResolvedConfiguration {
        ConfigurationResolver::new()
            .resolve(platform, Backend::CMake, &overrides)
            .unwrap()
            .config
    }

    fn configure(steps: &[Step]) -> &Step {
        steps
            .iter()
            .find(|s| s.kind == StepKind::Configure)
            .unwrap()
    }

    #[test]
    fn test_configure_passes_cache_entries() {
        let cfg = config(
            Platform::Unix,
            Overrides::new()
                .set("BUILD_SHARED_LIBS", "off")
                .set("CMAKE_INSTALL_PREFIX", "/opt/j2k")
                .set("WITH_JPWL", true),
        );
        let steps = render(&cfg, &[], &RenderOptions::default());
        let cmd = &configure(&steps).command;

        assert_eq!(&cmd[..3], &["cmake", "-G", "Unix Makefiles"]);
        assert!(cmd.contains(&"-DBUILD_SHARED_LIBS:BOOL=OFF".to_string()));
        assert!(cmd.contains(&"-DCMAKE_INSTALL_PREFIX:PATH=/opt/j2k".to_string()));
        assert!(cmd.contains(&"-DCMAKE_BUILD_TYPE:STRING=Release".to_string()));
        assert!(!cmd.iter().any(|a| a.contains("WITH_JPWL")));
        assert_eq!(cmd.last().map(String::as_str), Some("."));
    }

    #[test]
    fn test_osx_architectures_only_on_macos() {
        let overrides = Overrides::new().set("CMAKE_OSX_ARCHITECTURES", "x86_64;arm64");
        let options = RenderOptions::default();

        let mac = render(&config(Platform::MacOS, overrides.clone()), &[], &options);
        assert!(configure(&mac)
            .command
            .contains(&"-DCMAKE_OSX_ARCHITECTURES:STRING=x86_64;arm64".to_string()));

        let unix = render(&config(Platform::Unix, overrides), &[], &options);
        assert!(!configure(&unix)
            .command
            .iter()
            .any(|a| a.contains("CMAKE_OSX_ARCHITECTURES")));
    }

    #[test]
    fn test_windows_generators() {
        let cfg = config(Platform::WindowsNative, Overrides::new());

        let nmake = render(&cfg, &[], &RenderOptions::default());
        assert!(configure(&nmake).command.contains(&"NMake Makefiles".to_string()));
        let install = nmake.iter().find(|s| s.kind == StepKind::Install).unwrap();
        assert_eq!(install.command, vec!["nmake", "install"]);

        let options = RenderOptions {
            mingw_make: true,
            jobs: Some(8),
            ..RenderOptions::default()
        };
        let mingw = render(&cfg, &[], &options);
        assert!(configure(&mingw).command.contains(&"MinGW Makefiles".to_string()));
        let build = mingw.iter().find(|s| s.kind == StepKind::Build).unwrap();
        assert_eq!(build.command, vec!["mingw32-make", "-j8"]);
    }

    #[test]
    fn test_explicit_generator_uses_cmake_build() {
        let options = RenderOptions {
            generator: Some("Visual Studio 17 2022".to_string()),
            jobs: Some(2),
            ..RenderOptions::default()
        };
        let cfg = config(Platform::WindowsNative, Overrides::new());
        let steps = render(&cfg, &[], &options);
        let build = steps.iter().find(|s| s.kind == StepKind::Build).unwrap();
        assert_eq!(
            build.command,
            vec!["cmake", "--build", ".", "--parallel", "2"]
        );
        let clean = steps.iter().find(|s| s.kind == StepKind::Clean).unwrap();
        assert_eq!(
            clean.command,
            vec!["cmake", "--build", ".", "--target", "clean"]
        );
    }

    #[test]
    fn test_test_step_when_planned() {
        let cfg = config(Platform::Unix, Overrides::new());
        let targets = vec![BuildTarget::new("test", TargetKind::Test)];
        let steps = render(&cfg, &targets, &RenderOptions::default());
        assert!(steps.iter().any(|s| s.kind == StepKind::Test));
        assert!(!steps.iter().any(|s| s.kind == StepKind::DistClean));
        assert!(!steps.iter().any(|s| s.kind == StepKind::Uninstall));
    }
}
