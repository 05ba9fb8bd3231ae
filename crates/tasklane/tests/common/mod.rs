//! Common test utilities shared across integration tests.

use std::path::Path;
use std::process::{Command, Output};

/// Run the tasklane binary in the specified directory.
///
/// Colors are disabled so assertions can match plain text.
pub fn run_tasklane_in_dir(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_tasklane"))
        .args(args)
        .current_dir(dir)
        .env("NO_COLOR", "1")
        .env("TASKLANE_ASCII", "1")
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute tasklane binary")
}

/// Run a command that must succeed and return its stdout.
pub fn run_ok(dir: &Path, args: &[&str]) -> String {
    let output = run_tasklane_in_dir(dir, args);
    assert!(
        output.status.success(),
        "tasklane {args:?} failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).into_owned()
}

/// Run a command with `--json` and parse its stdout.
pub fn run_json(dir: &Path, args: &[&str]) -> serde_json::Value {
    let mut with_json = args.to_vec();
    with_json.push("--json");
    let stdout = run_ok(dir, &with_json);
    serde_json::from_str(&stdout).expect("stdout should be valid JSON")
}
