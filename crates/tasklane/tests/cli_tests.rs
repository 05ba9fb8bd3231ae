//! Integration tests for the tasklane CLI.
//!
//! These tests run the compiled binary against a temporary repository.

use rstest::{fixture, rstest};
use tempfile::TempDir;

mod common;
use common::{run_json, run_ok, run_tasklane_in_dir};

// ============================================================================
// Test Fixtures
// ============================================================================

/// Provides a temporary directory with an initialized tasklane repository
#[fixture]
fn initialized_dir() -> TempDir {
    let temp = TempDir::new().expect("Failed to create temp directory");
    run_ok(temp.path(), &["init", "--quiet"]);
    temp
}

// ============================================================================
// Help and Init
// ============================================================================

#[test]
fn test_cli_help() {
    let temp = TempDir::new().unwrap();
    let stdout = run_ok(temp.path(), &["--help"]);
    assert!(stdout.contains("tasklane"));
    assert!(stdout.contains("Usage:"));
}

#[test]
fn test_init_creates_repository() {
    let temp = TempDir::new().unwrap();

    let stdout = run_ok(temp.path(), &["init"]);

    assert!(stdout.contains("Initialized tasklane"));
    assert!(temp.path().join(".tasklane/config.yaml").exists());
    assert!(temp.path().join(".tasklane/tasks.jsonl").exists());
}

#[rstest]
fn test_init_twice_fails(initialized_dir: TempDir) {
    let output = run_tasklane_in_dir(initialized_dir.path(), &["init"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("already initialized"));
}

#[test]
fn test_commands_require_repository() {
    let temp = TempDir::new().unwrap();
    let output = run_tasklane_in_dir(temp.path(), &["list"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Not a tasklane repository"));
}

// ============================================================================
// Task Workflow
// ============================================================================

#[rstest]
fn test_add_and_list(initialized_dir: TempDir) {
    let dir = initialized_dir.path();
    run_ok(dir, &["add", "Design", "--due", "2024-01-10"]);
    run_ok(dir, &["add", "Build", "--due", "2024-01-20", "--deps", "1"]);
    run_ok(dir, &["add", "Docs"]);

    let stdout = run_ok(dir, &["list"]);

    assert!(stdout.contains("3 task(s), critical path length 2"));
    assert!(stdout.contains("* #1 L0 Design  due 2024-01-10"));
    assert!(stdout.contains("* #2 L1 Build  due 2024-01-20  start 2024-01-11  after #1"));
    assert!(stdout.contains("  #3 L0 Docs"));
}

#[rstest]
fn test_list_json(initialized_dir: TempDir) {
    let dir = initialized_dir.path();
    run_ok(dir, &["add", "A"]);
    run_ok(dir, &["add", "B", "--deps", "1"]);

    let board = run_json(dir, &["list"]);

    assert_eq!(board["tasks"].as_array().unwrap().len(), 2);
    assert_eq!(board["analysis"]["critical_path"], serde_json::json!([1, 2]));
    assert_eq!(board["analysis"]["path_length"], 2);
}

#[rstest]
fn test_rejected_adds_leave_no_trace(initialized_dir: TempDir) {
    let dir = initialized_dir.path();
    run_ok(dir, &["add", "Late", "--due", "2024-03-01"]);

    let output = run_tasklane_in_dir(dir, &["add", "Early", "--due", "2024-02-01", "--deps", "1"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Dependency 1 is due 2024-03-01"));

    let output = run_tasklane_in_dir(dir, &["add", "Orphan", "--deps", "9"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Task not found: 9"));

    let board = run_json(dir, &["list"]);
    assert_eq!(board["tasks"].as_array().unwrap().len(), 1, "rejected adds leave no trace");
}

#[rstest]
fn test_deps_rejects_cycle_and_check_reports_it(initialized_dir: TempDir) {
    let dir = initialized_dir.path();
    run_ok(dir, &["add", "One"]);
    run_ok(dir, &["add", "Two", "--deps", "1"]);

    let check = run_json(dir, &["check", "1", "2"]);
    assert_eq!(check["would_create_cycle"], true);

    let output = run_tasklane_in_dir(dir, &["deps", "1", "2"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Circular dependency"));

    let task = run_json(dir, &["show", "1"]);
    assert_eq!(task["dependencies"], serde_json::json!([]));
    assert_eq!(task["dependents"], serde_json::json!([2]));
}

#[rstest]
fn test_deps_replace_and_clear(initialized_dir: TempDir) {
    let dir = initialized_dir.path();
    run_ok(dir, &["add", "One"]);
    run_ok(dir, &["add", "Two"]);
    run_ok(dir, &["add", "Three"]);

    let stdout = run_ok(dir, &["deps", "3", "2", "1"]);
    assert!(stdout.contains("Task #3 now depends on #1, #2"));

    let stdout = run_ok(dir, &["deps", "3"]);
    assert!(stdout.contains("Cleared dependencies of task #3"));
}

#[rstest]
fn test_rm_and_path(initialized_dir: TempDir) {
    let dir = initialized_dir.path();
    run_ok(dir, &["add", "One"]);
    run_ok(dir, &["add", "Two", "--deps", "1"]);
    run_ok(dir, &["add", "Three", "--deps", "2"]);

    let stdout = run_ok(dir, &["path"]);
    assert!(stdout.contains("Critical path (3 task(s)):"));
    assert!(stdout.contains("-> #3 Three"));

    run_ok(dir, &["rm", "2"]);

    let analysis = run_json(dir, &["path"]);
    assert_eq!(analysis["path_length"], 1);
    let three = run_json(dir, &["show", "3"]);
    assert_eq!(three["dependencies"], serde_json::json!([]));
}

#[rstest]
fn test_show_missing_task(initialized_dir: TempDir) {
    let output = run_tasklane_in_dir(initialized_dir.path(), &["show", "7"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Task not found: 7"));
}
