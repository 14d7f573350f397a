//! Integration tests for the cloudfn CLI.
//!
//! These tests verify that the CLI binary behaves correctly, including
//! argument parsing, help text, version output, and completions.

mod common;

use common::TestEnv;
use predicates::prelude::*;

/// Test that the binary without arguments fails and shows usage.
#[test]
fn test_cli_no_arguments() {
    let env = TestEnv::new();

    env.command()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage:"));
}

/// Test that the --version flag displays version information.
#[test]
fn test_cli_version_flag() {
    let env = TestEnv::new();

    env.command()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("cloudfn"))
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

/// Test that the --help flag lists every command.
#[test]
fn test_cli_help_flag() {
    let env = TestEnv::new();

    env.command()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("validate"))
        .stdout(predicate::str::contains("describe"))
        .stdout(predicate::str::contains("options"))
        .stdout(predicate::str::contains("completions"));
}

/// Test that an unknown subcommand is rejected by clap.
#[test]
fn test_cli_unknown_command() {
    let env = TestEnv::new();

    env.command()
        .arg("deploy")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unrecognized subcommand"));
}

/// Test bash completion generation.
#[test]
fn test_completions_bash() {
    let env = TestEnv::new();

    env.command()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("cloudfn"))
        .stderr(predicate::str::contains("Generating bash completion script"));
}

/// Test that --quiet suppresses completion instructions.
#[test]
fn test_completions_quiet() {
    let env = TestEnv::new();

    env.command()
        .args(["--quiet", "completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef cloudfn"))
        .stderr(predicate::str::is_empty());
}

/// Test the options listing in both formats.
#[test]
fn test_options_command() {
    let env = TestEnv::new();

    env.command()
        .arg("options")
        .assert()
        .success()
        .stdout(predicate::str::contains("us-central1 (default)"))
        .stdout(predicate::str::contains("2GB"))
        .stdout(predicate::str::contains("Timeout (seconds): 0-540"));

    let output = env
        .command()
        .args(["options", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["regions"].as_array().unwrap().len(), 8);
    assert_eq!(value["timeoutSeconds"]["min"], 0);
}
