//! Integration tests for the scriptlog binary

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

use super::helpers::{fixtures_dir, run_scriptlog, temp_fixture, write_session, FIXTURE_START};

fn fixture_args<'a>(capture: &'a str, extra: &[&'a str]) -> Vec<&'a str> {
    let mut args = vec![capture, "--start", FIXTURE_START, "--tz", "Asia/Tokyo"];
    args.extend_from_slice(extra);
    args
}

// ============================================================================
// Help and Version
// ============================================================================

#[test]
fn help_exits_0_and_shows_usage() {
    let (stdout, _stderr, exit_code) = run_scriptlog(&["--help"]);

    assert_eq!(exit_code, 0);
    assert!(stdout.contains("<CAPTURE>"));
    assert!(stdout.contains("[TIMING]"));
    assert!(stdout.contains("--commands-only"));
}

#[test]
fn version_shows_package_version() {
    Command::cargo_bin("scriptlog")
        .unwrap()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn missing_capture_argument_is_usage_error() {
    let (_stdout, stderr, exit_code) = run_scriptlog(&[]);

    assert_eq!(exit_code, 2);
    assert!(stderr.contains("<CAPTURE>"));
}

// ============================================================================
// Conversion
// ============================================================================

#[test]
fn converts_fixture_to_stdout() {
    let capture = fixtures_dir().join("session");
    let capture = capture.to_str().unwrap();
    let (stdout, stderr, exit_code) = run_scriptlog(&fixture_args(capture, &[]));

    assert_eq!(exit_code, 0, "stderr: {stderr}");
    assert_eq!(stdout.lines().count(), 8);
    assert!(stdout.starts_with("00:00:02,2025/09/03 21:34:03,AAAA,user@host:~$ ls -la"));
}

#[test]
fn commands_only_without_prompt() {
    let capture = fixtures_dir().join("session");
    let capture = capture.to_str().unwrap();
    let (stdout, _stderr, exit_code) =
        run_scriptlog(&fixture_args(capture, &["--commands-only", "--no-prompt", "--tag", "DEV"]));

    assert_eq!(exit_code, 0);
    let contents: Vec<&str> = stdout.lines().map(|l| l.splitn(4, ',').nth(3).unwrap()).collect();
    assert_eq!(contents, vec!["ls -la", "echo ✓ done", "fetch", "exit"]);
    assert!(stdout.lines().all(|l| l.contains(",DEV,")));
}

#[test]
fn explicit_timing_path_is_used() {
    let temp_dir = TempDir::new().unwrap();
    let capture = write_session(temp_dir.path(), "cap", b"hello\n", "0.1 6\n");
    let renamed = temp_dir.path().join("elsewhere.tm");
    fs::rename(temp_dir.path().join("cap.timing"), &renamed).unwrap();

    let (stdout, stderr, exit_code) = run_scriptlog(&[
        capture.to_str().unwrap(),
        renamed.to_str().unwrap(),
        "--start",
        "2025/01/01 00:00:00",
    ]);

    assert_eq!(exit_code, 0, "stderr: {stderr}");
    assert_eq!(stdout, "00:00:00,2025/01/01 00:00:00,AAAA,hello\n");
}

#[test]
fn output_file_is_created_with_parents_and_truncated() {
    let (temp_dir, capture) = temp_fixture("session");
    let output = temp_dir.path().join("out").join("nested").join("session.log");
    let output_str = output.to_str().unwrap();
    let capture_str = capture.to_str().unwrap();

    for _ in 0..2 {
        let (stdout, _stderr, exit_code) =
            run_scriptlog(&fixture_args(capture_str, &["-o", output_str]));
        assert_eq!(exit_code, 0);
        assert!(stdout.is_empty());
    }

    assert_eq!(fs::read_to_string(&output).unwrap().lines().count(), 8);
}

#[test]
fn append_adds_to_existing_output() {
    let (temp_dir, capture) = temp_fixture("session");
    let output = temp_dir.path().join("session.log");
    fs::write(&output, "existing line\n").unwrap();

    let (_stdout, _stderr, exit_code) = run_scriptlog(&fixture_args(
        capture.to_str().unwrap(),
        &["-o", output.to_str().unwrap(), "--append"],
    ));

    assert_eq!(exit_code, 0);
    let written = fs::read_to_string(&output).unwrap();
    assert!(written.starts_with("existing line\n"));
    assert_eq!(written.lines().count(), 9);
}

#[test]
fn config_file_settings_apply_and_flags_override() {
    let (temp_dir, capture) = temp_fixture("session");
    let config = temp_dir.path().join("config.toml");
    fs::write(
        &config,
        "[output]\ntag = \"CONF\"\n\n[extract]\nmode = \"prompt-command\"\nprefix_prompt = false\n",
    )
    .unwrap();
    let config_str = config.to_str().unwrap();
    let capture_str = capture.to_str().unwrap();

    let (stdout, _stderr, exit_code) =
        run_scriptlog(&fixture_args(capture_str, &["--config", config_str]));
    assert_eq!(exit_code, 0);
    assert_eq!(stdout.lines().count(), 4);
    assert!(stdout.contains(",CONF,ls -la"));

    let (stdout, _stderr, exit_code) =
        run_scriptlog(&fixture_args(capture_str, &["--config", config_str, "--tag", "CLI"]));
    assert_eq!(exit_code, 0);
    assert!(stdout.contains(",CLI,ls -la"));
}

#[test]
fn caret_notation_flag_decodes_cat_v_capture() {
    let temp_dir = TempDir::new().unwrap();
    let capture = write_session(
        temp_dir.path(),
        "catv",
        b"^[[01;32mok^[[00m^M\n",
        "0.25 20\n",
    );
    let capture_str = capture.to_str().unwrap();

    let (stdout, _stderr, exit_code) =
        run_scriptlog(&fixture_args(capture_str, &["--caret-notation"]));
    assert_eq!(exit_code, 0);
    assert_eq!(stdout.trim_end(), "00:00:00,2025/09/03 21:34:01,AAAA,ok");

    let (stdout, _stderr, exit_code) = run_scriptlog(&fixture_args(capture_str, &[]));
    assert_eq!(exit_code, 0);
    assert!(stdout.contains("AAAA,^[[01;32mok^[[00m^M"), "stdout: {stdout}");
}

#[test]
fn verbose_logs_summary_to_stderr() {
    let capture = fixtures_dir().join("session");
    let (stdout, stderr, exit_code) =
        run_scriptlog(&fixture_args(capture.to_str().unwrap(), &["-v"]));

    assert_eq!(exit_code, 0);
    assert!(stderr.contains("records=8"), "stderr: {stderr}");
    assert!(!stdout.contains("records="));
}

// ============================================================================
// Error Handling
// ============================================================================

#[test]
fn missing_capture_exits_1_with_path() {
    let (stdout, stderr, exit_code) = run_scriptlog(&["/nonexistent/session"]);

    assert_eq!(exit_code, 1);
    assert!(stdout.is_empty());
    assert!(stderr.contains("capture"));
    assert!(stderr.contains("/nonexistent/session"));
}

#[test]
fn missing_timing_does_not_touch_output() {
    let temp_dir = TempDir::new().unwrap();
    let capture = temp_dir.path().join("lonely");
    fs::write(&capture, b"data\n").unwrap();
    let output = temp_dir.path().join("keep.log");
    fs::write(&output, "previous\n").unwrap();

    Command::cargo_bin("scriptlog")
        .unwrap()
        .env_remove("RUST_LOG")
        .args([capture.to_str().unwrap(), "-o", output.to_str().unwrap()])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("timing file"));

    assert_eq!(fs::read_to_string(&output).unwrap(), "previous\n");
}

#[test]
fn unknown_time_zone_exits_1() {
    let capture = fixtures_dir().join("session");
    let (_stdout, stderr, exit_code) =
        run_scriptlog(&[capture.to_str().unwrap(), "--tz", "Mars/Olympus"]);

    assert_eq!(exit_code, 1);
    assert!(stderr.contains("Mars/Olympus"));
}

#[test]
fn invalid_start_exits_1() {
    let capture = fixtures_dir().join("session");
    let (_stdout, stderr, exit_code) =
        run_scriptlog(&[capture.to_str().unwrap(), "--start", "tomorrow"]);

    assert_eq!(exit_code, 1);
    assert!(stderr.contains("tomorrow"));
}

#[test]
fn invalid_unit_is_usage_error() {
    let capture = fixtures_dir().join("session");
    let (_stdout, _stderr, exit_code) =
        run_scriptlog(&[capture.to_str().unwrap(), "--unit", "hours"]);

    assert_eq!(exit_code, 2);
}
