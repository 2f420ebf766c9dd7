//! Shared helpers for integration tests

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::TempDir;

/// Start instant used by every fixture run.
pub const FIXTURE_START: &str = "2025-09-03T21:34:01+09:00";

/// Directory holding the committed fixtures.
pub fn fixtures_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures")
}

/// Copy a capture fixture and its `.timing` sidecar into a fresh temp dir.
///
/// Returns the temp dir (keep it alive) and the copied capture path.
pub fn temp_fixture(name: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let capture = temp_dir.path().join(name);

    fs::copy(fixtures_dir().join(name), &capture).expect("Failed to copy capture fixture");
    fs::copy(
        fixtures_dir().join(format!("{}.timing", name)),
        temp_dir.path().join(format!("{}.timing", name)),
    )
    .expect("Failed to copy timing fixture");

    (temp_dir, capture)
}

/// Write a capture and timing pair into `dir`, returning the capture path.
pub fn write_session(dir: &Path, name: &str, capture: &[u8], timing: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, capture).expect("Failed to write capture");
    fs::write(dir.join(format!("{}.timing", name)), timing).expect("Failed to write timing");
    path
}

/// Run the scriptlog binary and capture its output.
pub fn run_scriptlog(args: &[&str]) -> (String, String, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_scriptlog"))
        .args(args)
        .env_remove("RUST_LOG")
        .env("XDG_CONFIG_HOME", std::env::temp_dir().join("scriptlog-tests-no-config"))
        .output()
        .expect("Failed to execute scriptlog");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let exit_code = output.status.code().unwrap_or(-1);

    (stdout, stderr, exit_code)
}
