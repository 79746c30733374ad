//! End-to-end CLI tests exercising the compiled binary.

use assert_cmd::Command;
use predicates::prelude::*;

fn nodestrap() -> Command {
    let mut cmd = Command::cargo_bin("nodestrap").unwrap();
    cmd.env_remove("NODESTRAP_NODE_VERSION");
    cmd
}

#[test]
fn help_lists_subcommands() {
    nodestrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("check"))
        .stdout(predicate::str::contains("install"));
}

#[test]
fn version_flag_prints_crate_version() {
    nodestrap()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn check_reports_missing_runtime_on_empty_path() {
    nodestrap()
        .arg("check")
        .env("PATH", "")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("not installed"));
}

#[test]
fn check_quiet_suppresses_output() {
    nodestrap()
        .args(["check", "--quiet"])
        .env("PATH", "")
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty());
}

#[test]
fn check_honors_version_env_var() {
    nodestrap()
        .arg("check")
        .env("PATH", "")
        .env("NODESTRAP_NODE_VERSION", "not-a-version")
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid version"));
}

#[test]
fn invalid_version_flag_is_rejected() {
    nodestrap()
        .args(["check", "--runtime-version", "latest"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid version"));
}

#[test]
fn install_rejects_invalid_version_before_touching_anything() {
    nodestrap()
        .args(["install", "--runtime-version", "not.a.version"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid version"));
}

#[test]
fn unknown_flag_is_a_usage_error() {
    nodestrap()
        .args(["install", "--definitely-not-a-flag"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--definitely-not-a-flag"));
}
