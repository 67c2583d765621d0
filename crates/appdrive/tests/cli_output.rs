//! Integration tests for appdrive CLI output behavior
//!
//! The default behavior is quiet (errors only). Use -v/--verbose to enable logs.
//! These tests avoid commands that need a desktop session.

use std::fs;
use std::process::{Command, Output};

fn run_appdrive(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_appdrive"))
        .args(args)
        .output()
        .expect("Failed to execute appdrive")
}

#[test]
fn test_help_lists_subcommands() {
    let output = run_appdrive(&["--help"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    for subcommand in ["list", "wait", "count", "run"] {
        assert!(
            stdout.contains(subcommand),
            "help should mention '{}': {}",
            subcommand,
            stdout
        );
    }
}

#[test]
fn test_version_flag() {
    let output = run_appdrive(&["--version"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_missing_subcommand_fails() {
    let output = run_appdrive(&[]);
    assert!(!output.status.success());
}

/// Missing scenario files fail before any desktop access
#[test]
fn test_run_missing_scenario_fails() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("missing.toml");

    let output = run_appdrive(&["run", path.to_str().unwrap()]);
    assert!(!output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Failed to load scenario"),
        "stderr should explain the failure: {}",
        stderr
    );
}

/// Verify that default mode suppresses INFO-level logs even on failure
#[test]
fn test_default_mode_suppresses_info_logs() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("missing.toml");

    let output = run_appdrive(&["run", path.to_str().unwrap()]);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(
        !stderr.contains(r#""level":"INFO""#),
        "Default mode should suppress INFO logs, but stderr contains: {}",
        stderr
    );
    assert!(
        stderr.contains(r#""level":"ERROR""#),
        "Errors are still logged in default mode: {}",
        stderr
    );
}

#[test]
fn test_verbose_mode_emits_info_logs() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("missing.toml");

    let output = run_appdrive(&["-v", "run", path.to_str().unwrap()]);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(
        stderr.contains(r#""level":"INFO""#),
        "Verbose mode should emit INFO logs: {}",
        stderr
    );
    assert!(stderr.contains("cli.run_started"));
}

#[test]
fn test_invalid_scenario_is_rejected() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("bad.toml");
    fs::write(
        &path,
        r#"
        [app]
        program = "sleep"
        main_window = "X"

        [[steps]]
        action = "keys"
        sequence = "{NOPE}"
        "#,
    )
    .unwrap();

    let output = run_appdrive(&["run", path.to_str().unwrap()]);
    assert!(!output.status.success());

    // Nothing reaches stdout when the scenario never ran
    assert!(output.stdout.is_empty());
}

#[test]
fn test_list_help_mentions_controls() {
    let output = run_appdrive(&["list", "--help"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("windows"));
    assert!(stdout.contains("controls"), "list help: {}", stdout);
}
