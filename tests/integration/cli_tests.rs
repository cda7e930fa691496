//! CLI integration tests
//!
//! These tests verify that the binary wires configuration, analysis and
//! reporting together and exits with the right status.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn project(files: &[(&str, &str)]) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    fs::write(dir.path().join("tsconfig.json"), r#"{ "include": ["src"] }"#).unwrap();
    for (path, contents) in files {
        let full = dir.path().join(path);
        fs::create_dir_all(full.parent().unwrap()).unwrap();
        fs::write(full, contents).unwrap();
    }
    let config_path = dir.path().join("tsconfig.json");
    (dir, config_path)
}

fn deadwire() -> Command {
    Command::cargo_bin("deadwire").expect("binary not built")
}

fn dead_class_project() -> (TempDir, PathBuf) {
    project(&[
        ("src/widget.ts", "export class Widget {}\n"),
        ("src/main.ts", "export function main() {}\n"),
    ])
}

// ============================================================================
// Basic CLI Tests
// ============================================================================

#[test]
fn test_help() {
    deadwire()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("tsconfig"))
        .stdout(predicate::str::contains("--fail-on-findings"));
}

#[test]
fn test_version() {
    deadwire()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_missing_tsconfig_fails() {
    let dir = tempfile::tempdir().unwrap();

    deadwire()
        .arg(dir.path().join("tsconfig.json"))
        .arg("--quiet")
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_clean_project_exits_zero() {
    let (_dir, config_path) = project(&[
        ("src/widget.ts", "export class Widget {}\n"),
        ("src/main.ts", "import { Widget } from './widget';\nnew Widget();\n"),
    ]);

    deadwire()
        .arg(&config_path)
        .args(["--quiet", "--fail-on-findings"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No dead code found"));
}

// ============================================================================
// Output
// ============================================================================

#[test]
fn test_terminal_output_lists_findings() {
    let (_dir, config_path) = dead_class_project();

    deadwire()
        .arg(&config_path)
        .arg("--quiet")
        .assert()
        .success()
        .stdout(predicate::str::contains("Dead class: Widget has no call-sites"))
        .stdout(predicate::str::contains("widget.ts"));
}

#[test]
fn test_json_output() {
    let (_dir, config_path) = dead_class_project();

    let output = deadwire()
        .arg(&config_path)
        .args(["--quiet", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["total_issues"], 1);
    assert_eq!(report["summary"]["dead-class"], 1);
    assert_eq!(report["issues"][0]["id"], "dead-code:src/widget.ts:1:1:dead-class");
    assert_eq!(report["issues"][0]["source"], "dead-code");
}

#[test]
fn test_json_output_to_file() {
    let (dir, config_path) = dead_class_project();
    let report_path = dir.path().join("report.json");

    deadwire()
        .arg(&config_path)
        .args(["--quiet", "--format", "json", "--output"])
        .arg(&report_path)
        .assert()
        .success();

    let report: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&report_path).unwrap()).unwrap();
    assert_eq!(report["issues"][0]["code"], "dead-class");
}

// ============================================================================
// Options
// ============================================================================

#[test]
fn test_fail_on_findings() {
    let (_dir, config_path) = dead_class_project();

    deadwire()
        .arg(&config_path)
        .args(["--quiet", "--fail-on-findings"])
        .assert()
        .code(1);
}

#[test]
fn test_allow_class_flag() {
    let (_dir, config_path) = dead_class_project();

    deadwire()
        .arg(&config_path)
        .args(["--quiet", "--fail-on-findings", "--allow-class", "Widget"])
        .assert()
        .success();
}

#[test]
fn test_allow_file_flag() {
    let (_dir, config_path) = dead_class_project();

    deadwire()
        .arg(&config_path)
        .args(["--quiet", "--fail-on-findings", "--allow-file", "src/widget.ts"])
        .assert()
        .success();
}

#[test]
fn test_functions_flag() {
    let (_dir, config_path) = dead_class_project();

    deadwire()
        .arg(&config_path)
        .args(["--quiet", "--functions"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Dead function: main() has no call-sites"));
}

#[test]
fn test_settings_file_next_to_tsconfig() {
    let (dir, config_path) = dead_class_project();
    fs::write(
        dir.path().join(".deadwire.yml"),
        "allowlist:\n  classes:\n    - Widget\n",
    )
    .unwrap();

    deadwire()
        .arg(&config_path)
        .args(["--quiet", "--fail-on-findings"])
        .assert()
        .success();
}

#[test]
fn test_invalid_settings_file_fails() {
    let (dir, config_path) = dead_class_project();
    let settings = dir.path().join("settings.toml");
    fs::write(&settings, "detection = [1, 2").unwrap();

    deadwire()
        .arg(&config_path)
        .arg("--quiet")
        .arg("--config")
        .arg(&settings)
        .assert()
        .failure()
        .stderr(predicate::str::contains("settings"));
}
