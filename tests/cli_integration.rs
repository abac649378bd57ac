//! CLI integration tests for jp2build.
//!
//! Every test runs with HOME and the working directory pointed at a fresh
//! temporary directory so user configuration never leaks in.

use std::fs;
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use tempfile::TempDir;

/// Get the jp2build binary command, isolated in `home`.
fn jp2build(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("jp2build").unwrap();
    cmd.env("HOME", home.path())
        .env_remove("RUST_LOG")
        .current_dir(home.path());
    cmd
}

fn temp_dir() -> TempDir {
    TempDir::new().unwrap()
}

// ============================================================================
// jp2build resolve
// ============================================================================

#[test]
fn test_resolve_defaults_succeeds() {
    let tmp = temp_dir();

    jp2build(&tmp)
        .args(["resolve", "--platform", "unix", "--backend", "cmake"])
        .assert()
        .code(0)
        .stdout(predicate::str::contains("link mode:      shared"))
        .stdout(predicate::str::contains("BUILD_CODEC"));
}

#[test]
fn test_resolve_static_link_mode() {
    let tmp = temp_dir();

    jp2build(&tmp)
        .args([
            "resolve",
            "--platform",
            "unix",
            "--backend",
            "autotools",
            "--set",
            "BUILD_SHARED_LIBS=OFF",
        ])
        .assert()
        .code(0)
        .stdout(predicate::str::contains("link mode:      static"));
}

#[test]
fn test_resolve_autotools_on_windows_native_fails() {
    let tmp = temp_dir();

    jp2build(&tmp)
        .args(["resolve", "--platform", "win-native", "--backend", "autotools"])
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("backend `autotools` cannot be used on win-native"));
}

#[test]
fn test_resolve_unknown_flag_fails() {
    let tmp = temp_dir();

    jp2build(&tmp)
        .args([
            "resolve",
            "--platform",
            "unix",
            "--backend",
            "cmake",
            "--set",
            "BUILD_EVERYTHING=ON",
        ])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("unknown flag `BUILD_EVERYTHING`"));
}

#[test]
fn test_resolve_type_mismatch_fails() {
    let tmp = temp_dir();

    jp2build(&tmp)
        .args([
            "resolve",
            "--platform",
            "unix",
            "--backend",
            "cmake",
            "--set",
            "BUILD_CODEC=maybe",
        ])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("BUILD_CODEC"));
}

#[test]
fn test_resolve_testing_without_data_root_fails() {
    let tmp = temp_dir();

    jp2build(&tmp)
        .args([
            "resolve",
            "--platform",
            "unix",
            "--backend",
            "cmake",
            "--set",
            "BUILD_TESTING=ON",
        ])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("JPEG2000_CONFORMANCE_DATA_ROOT"));
}

#[test]
fn test_resolve_indexer_off_windows_fails() {
    let tmp = temp_dir();

    jp2build(&tmp)
        .args([
            "resolve",
            "--platform",
            "macos",
            "--backend",
            "cmake",
            "--set",
            "BUILD_INDEXER_JPIP=ON",
        ])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("BUILD_INDEXER_JPIP"));
}

#[test]
fn test_resolve_manual_reports_advisory() {
    let tmp = temp_dir();

    jp2build(&tmp)
        .args(["resolve", "--platform", "unix", "--backend", "manual"])
        .assert()
        .code(2)
        .stdout(predicate::str::contains("backend:        manual"))
        .stderr(predicate::str::contains("warning:"))
        .stderr(predicate::str::contains("WITH_JPWL"));
}

#[test]
fn test_resolve_manual_symbol_under_cmake_is_advisory() {
    let tmp = temp_dir();

    jp2build(&tmp)
        .args([
            "resolve",
            "--platform",
            "unix",
            "--backend",
            "cmake",
            "--set",
            "WITH_JPWL=yes",
        ])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("only applies to the manual Makefile"));
}

#[test]
fn test_resolve_json_output() {
    let tmp = temp_dir();

    let output = jp2build(&tmp)
        .args([
            "resolve",
            "--platform",
            "unix",
            "--backend",
            "cmake",
            "--set",
            "CMAKE_INSTALL_PREFIX=/opt/openjpeg",
            "--format",
            "json",
        ])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(0));
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["platform"], "unix");
    assert_eq!(json["backend"], "cmake");
    assert_eq!(json["link_mode"], "shared");
    assert_eq!(json["install_prefix"], "/opt/openjpeg");
    assert_eq!(json["flag_set"]["BUILD_CODEC"], true);
}

#[test]
fn test_resolve_without_platform_fails() {
    let tmp = temp_dir();

    jp2build(&tmp)
        .args(["resolve", "--backend", "cmake"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("no platform given"));
}

#[test]
fn test_resolve_uses_project_config_defaults() {
    let tmp = temp_dir();
    fs::create_dir(tmp.path().join(".jp2build")).unwrap();
    fs::write(
        tmp.path().join(".jp2build/config.toml"),
        r#"
[defaults]
platform = "unix"
backend = "autotools"

[flags]
BUILD_SHARED_LIBS = false
"#,
    )
    .unwrap();

    jp2build(&tmp)
        .arg("resolve")
        .assert()
        .code(0)
        .stdout(predicate::str::contains("backend:        autotools"))
        .stdout(predicate::str::contains("link mode:      static"));
}

#[test]
fn test_resolve_invalid_platform_value_exits_one() {
    let tmp = temp_dir();

    jp2build(&tmp)
        .args(["resolve", "--platform", "amiga", "--backend", "cmake"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("invalid platform 'amiga'"));
}

#[test]
fn test_unknown_subcommand_exits_one() {
    let tmp = temp_dir();

    jp2build(&tmp).arg("configure").assert().code(1);
}

#[test]
fn test_help_exits_zero() {
    let tmp = temp_dir();

    jp2build(&tmp)
        .arg("--help")
        .assert()
        .code(0)
        .stdout(predicate::str::contains("resolve"));
}

#[test]
fn test_mistyped_config_flag_fails() {
    let tmp = temp_dir();
    fs::create_dir(tmp.path().join(".jp2build")).unwrap();
    fs::write(
        tmp.path().join(".jp2build/config.toml"),
        "[flags]\nBUILD_SHARED_LIBS = false\nBUILD_JPWL = 1\n",
    )
    .unwrap();

    jp2build(&tmp)
        .args(["resolve", "--platform", "unix", "--backend", "cmake"])
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("failed to parse config file"));
}

#[test]
fn test_set_overrides_config_flags() {
    let tmp = temp_dir();
    let config = tmp.path().join("custom.toml");
    fs::write(&config, "[flags]\nBUILD_SHARED_LIBS = false\n").unwrap();

    jp2build(&tmp)
        .args(["--config"])
        .arg(&config)
        .args([
            "resolve",
            "--platform",
            "unix",
            "--backend",
            "cmake",
            "--set",
            "BUILD_SHARED_LIBS=ON",
        ])
        .assert()
        .code(0)
        .stdout(predicate::str::contains("link mode:      shared"));
}

// ============================================================================
// jp2build plan
// ============================================================================

#[test]
fn test_plan_defaults_orders_library_first() {
    let tmp = temp_dir();

    let output = jp2build(&tmp)
        .args([
            "plan",
            "--platform",
            "unix",
            "--backend",
            "cmake",
            "--no-doxygen",
            "--format",
            "json",
        ])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(0));
    let targets: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let names: Vec<&str> = targets
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["name"].as_str().unwrap())
        .collect();
    assert_eq!(
        names,
        ["openjpeg", "image_to_j2k", "j2k_dump", "j2k_to_image"]
    );
}

#[test]
fn test_plan_docs_skipped_without_doxygen() {
    let tmp = temp_dir();

    jp2build(&tmp)
        .args([
            "plan",
            "--platform",
            "unix",
            "--backend",
            "cmake",
            "--set",
            "BUILD_DOC=ON",
            "--no-doxygen",
        ])
        .assert()
        .code(2)
        .stdout(predicate::str::contains("docs").not())
        .stderr(predicate::str::contains("Doxygen"));
}

#[test]
fn test_plan_docs_included_with_doxygen() {
    let tmp = temp_dir();

    jp2build(&tmp)
        .args([
            "plan",
            "--platform",
            "unix",
            "--backend",
            "cmake",
            "--set",
            "BUILD_DOC=ON",
            "--doxygen",
        ])
        .assert()
        .code(0)
        .stdout(predicate::str::contains("docs (docs)"));
}

#[test]
fn test_plan_from_resolved_json() {
    let tmp = temp_dir();

    let output = jp2build(&tmp)
        .args([
            "resolve",
            "--platform",
            "win-native",
            "--backend",
            "cmake",
            "--set",
            "BUILD_INDEXER_JPIP=ON",
            "--set",
            "BUILD_CODEC=OFF",
            "--format",
            "json",
        ])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(0));

    let saved = tmp.path().join("resolved.json");
    fs::write(&saved, &output.stdout).unwrap();

    jp2build(&tmp)
        .args(["plan", "--no-doxygen", "--from"])
        .arg(&saved)
        .assert()
        .code(0)
        .stdout(predicate::str::contains("index_create"))
        .stdout(predicate::str::contains("image_to_j2k").not());
}

#[test]
fn test_plan_from_tampered_json_is_revalidated() {
    let tmp = temp_dir();
    let saved = tmp.path().join("resolved.json");
    fs::write(
        &saved,
        r#"{"platform":"unix","backend":"cmake","flag_set":{"BUILD_INDEXER_JPIP":true}}"#,
    )
    .unwrap();

    jp2build(&tmp)
        .args(["plan", "--from"])
        .arg(&saved)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("BUILD_INDEXER_JPIP"));
}

// ============================================================================
// jp2build render
// ============================================================================

#[test]
fn test_render_cmake_steps() {
    let tmp = temp_dir();

    jp2build(&tmp)
        .args([
            "render",
            "--platform",
            "unix",
            "--backend",
            "cmake",
            "--set",
            "BUILD_SHARED_LIBS=OFF",
            "--no-doxygen",
        ])
        .assert()
        .code(0)
        .stdout(predicate::str::contains("[configure] cmake -G \"Unix Makefiles\""))
        .stdout(predicate::str::contains("-DBUILD_SHARED_LIBS:BOOL=OFF"))
        .stdout(predicate::str::contains("[install] make install  (requires elevation)"));
}

#[test]
fn test_render_install_with_wrapper() {
    let tmp = temp_dir();

    jp2build(&tmp)
        .args([
            "render",
            "--platform",
            "unix",
            "--backend",
            "autotools",
            "--wrapper",
            "su -c",
            "--no-doxygen",
        ])
        .assert()
        .code(0)
        .stdout(predicate::str::contains("[install] su -c make install"))
        .stdout(predicate::str::contains("requires elevation").not());
}

#[test]
fn test_render_autotools_static_flags() {
    let tmp = temp_dir();

    jp2build(&tmp)
        .args([
            "render",
            "--platform",
            "unix",
            "--backend",
            "autotools",
            "--set",
            "BUILD_SHARED_LIBS=OFF",
            "--no-doxygen",
        ])
        .assert()
        .code(0)
        .stdout(predicate::str::contains("--disable-shared"))
        .stdout(predicate::str::contains("--enable-static"));
}

#[test]
fn test_render_json_marks_elevation() {
    let tmp = temp_dir();

    let output = jp2build(&tmp)
        .args([
            "render",
            "--platform",
            "unix",
            "--backend",
            "manual",
            "--set",
            "WITH_JPWL=yes",
            "--no-doxygen",
            "--format",
            "json",
        ])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(0));
    let steps: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let steps = steps.as_array().unwrap();
    for step in steps {
        let kind = step["kind"].as_str().unwrap();
        let elevated = step["requires_elevation"].as_bool().unwrap();
        assert_eq!(
            elevated,
            kind == "install" || kind == "uninstall",
            "step {kind}"
        );
    }
    assert!(steps.iter().any(|s| s["kind"] == "uninstall"));
}

#[test]
fn test_render_backend_mismatch_with_saved_config() {
    let tmp = temp_dir();
    let saved = tmp.path().join("resolved.json");
    let document = r#"{"platform":"unix","backend":"cmake","flag_set":{}}"#;
    fs::write(&saved, document).unwrap();

    jp2build(&tmp)
        .args(["render", "--backend", "autotools", "--no-doxygen", "--from"])
        .arg(&saved)
        .assert()
        .code(1)
        .stderr(predicate::str::contains(
            "`--backend autotools` does not match backend `cmake`",
        ));
}

#[test]
fn test_plan_backend_mismatch_with_saved_config() {
    let tmp = temp_dir();
    let saved = tmp.path().join("resolved.json");
    let document = r#"{"platform":"unix","backend":"cmake","flag_set":{}}"#;
    fs::write(&saved, document).unwrap();

    jp2build(&tmp)
        .args(["plan", "--backend", "manual", "--no-doxygen", "--from"])
        .arg(&saved)
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_render_zero_jobs_rejected() {
    let tmp = temp_dir();

    jp2build(&tmp)
        .args([
            "render",
            "--platform",
            "unix",
            "--backend",
            "cmake",
            "--jobs",
            "0",
        ])
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_render_dry_run_logs_steps() {
    let tmp = temp_dir();

    jp2build(&tmp)
        .args([
            "render",
            "--platform",
            "macos",
            "--backend",
            "cmake",
            "--no-doxygen",
            "--dry-run",
        ])
        .assert()
        .code(0)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("[configure] cmake"))
        .stderr(predicate::str::contains("(elevated) make install"));
}

#[test]
fn test_piped_logs_have_no_ansi_escapes() {
    let tmp = temp_dir();

    jp2build(&tmp)
        .args([
            "--verbose",
            "render",
            "--platform",
            "unix",
            "--backend",
            "autotools",
            "--no-doxygen",
            "--dry-run",
        ])
        .assert()
        .code(0)
        .stderr(predicate::str::contains("[configure] ./configure"))
        .stderr(predicate::str::contains("\x1b[").not());
}

// ============================================================================
// jp2build flags / matrix / completions
// ============================================================================

#[test]
fn test_flags_lists_registry() {
    let tmp = temp_dir();

    jp2build(&tmp)
        .arg("flags")
        .assert()
        .code(0)
        .stdout(predicate::str::contains("BUILD_SHARED_LIBS"))
        .stdout(predicate::str::contains("JPEG2000_CONFORMANCE_DATA_ROOT"))
        .stdout(predicate::str::contains("one of: Debug"));
}

#[test]
fn test_flags_json() {
    let tmp = temp_dir();

    let output = jp2build(&tmp)
        .args(["flags", "--format", "json"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let rows: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let shared = rows
        .as_array()
        .unwrap()
        .iter()
        .find(|r| r["name"] == "BUILD_SHARED_LIBS")
        .unwrap();
    assert_eq!(shared["kind"], "boolean");
    assert_eq!(shared["default"], "ON");
}

#[test]
fn test_matrix_reports_every_pair() {
    let tmp = temp_dir();

    let output = jp2build(&tmp)
        .args(["matrix", "--format", "json"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(0));
    let rows: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let rows = rows.as_array().unwrap();
    assert_eq!(rows.len(), 12);

    let status = |platform: &str, backend: &str| {
        rows.iter()
            .find(|r| r["platform"] == platform && r["backend"] == backend)
            .map(|r| r["status"].as_str().unwrap().to_string())
            .unwrap()
    };
    assert_eq!(status("unix", "cmake"), "ok");
    assert_eq!(status("win-native", "autotools"), "error");
    assert_eq!(status("win-native", "manual"), "error");
    assert_eq!(status("win-cygwin", "manual"), "advisory");
}

#[test]
fn test_completions_bash() {
    let tmp = temp_dir();

    jp2build(&tmp)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("jp2build"));
}
