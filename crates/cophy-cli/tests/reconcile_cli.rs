//! End-to-end `reconcile` subcommand tests, driving the built binary
//! directly rather than `assert_cmd`/`predicates` (not part of this
//! workspace's dependency set) — `std::process::Command` plus `tempfile`
//! cover the same ground.

use std::fs;
use std::process::Command;

fn cophy() -> Command {
    Command::new(env!("CARGO_BIN_EXE_cophy"))
}

fn write_input(dir: &tempfile::TempDir, body: &str) -> std::path::PathBuf {
    let path = dir.path().join("input.json");
    fs::write(&path, body).unwrap();
    path
}

#[test]
fn reconcile_reports_zero_cost_for_a_perfect_codivergence() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(
        &dir,
        r#"{
            "host_tree": "(a,b)c;",
            "associate_tree": "(1[&host=a,contents={x}],2[&host=b,contents={x}])r;"
        }"#,
    );

    let output = cophy()
        .args(["reconcile", "--input"])
        .arg(&input)
        .output()
        .expect("binary runs");

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("cost: 0"), "stdout was: {stdout}");
}

#[test]
fn reconcile_writes_to_the_output_file_when_given() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(
        &dir,
        r#"{
            "host_tree": "(a,b)c;",
            "associate_tree": "(1[&host=a,contents={x}],2[&host=b,contents={x}])r;"
        }"#,
    );
    let output_path = dir.path().join("result.txt");

    let status = cophy()
        .args(["reconcile", "--input"])
        .arg(&input)
        .args(["--output"])
        .arg(&output_path)
        .status()
        .expect("binary runs");

    assert!(status.success());
    let written = fs::read_to_string(&output_path).unwrap();
    assert!(written.contains("cost: 0"));
}

#[test]
fn reconcile_rejects_a_non_binary_host_tree() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(
        &dir,
        r#"{
            "host_tree": "(a,b,c)r;",
            "associate_tree": "1[&host=a,contents={x}];"
        }"#,
    );

    let output = cophy()
        .args(["reconcile", "--input"])
        .arg(&input)
        .output()
        .expect("binary runs");

    assert!(!output.status.success());
}

#[test]
fn reconcile_accepts_a_cost_override() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(
        &dir,
        r#"{
            "host_tree": "(a,b)c;",
            "associate_tree": "1[&host=a,contents={x}];"
        }"#,
    );

    let output = cophy()
        .args(["reconcile", "--input"])
        .arg(&input)
        .args(["--cost", "loss=5"])
        .output()
        .expect("binary runs");

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
}

#[test]
fn reconcile_applies_a_config_file_as_default_costs() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(
        &dir,
        r#"{
            "host_tree": "(a,b)c;",
            "associate_tree": "1[&host=a,contents={x}];"
        }"#,
    );
    let config_path = dir.path().join("costs.toml");
    fs::write(&config_path, "loss = 7\nduplication = 3\n").unwrap();

    let output = cophy()
        .args(["reconcile", "--input"])
        .arg(&input)
        .args(["--config"])
        .arg(&config_path)
        .output()
        .expect("binary runs");

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
}

#[test]
fn reconcile_single_solution_emits_a_history() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(
        &dir,
        r#"{
            "host_tree": "(a,b)c;",
            "associate_tree": "(1[&host=a,contents={x}],2[&host=b,contents={x}])r;"
        }"#,
    );

    let output = cophy()
        .args(["reconcile", "--input"])
        .arg(&input)
        .args(["--method", "single-solution"])
        .output()
        .expect("binary runs");

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("history:"), "stdout was: {stdout}");
}

#[test]
fn reconcile_json_output_is_valid_json() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(
        &dir,
        r#"{
            "host_tree": "(a,b)c;",
            "associate_tree": "(1[&host=a,contents={x}],2[&host=b,contents={x}])r;"
        }"#,
    );

    let output = cophy()
        .args(["reconcile", "--input"])
        .arg(&input)
        .args(["--format", "json"])
        .output()
        .expect("binary runs");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let parsed: serde_json::Value = serde_json::from_str(&stdout).expect("valid JSON");
    assert_eq!(parsed["cost"].as_i64(), Some(0));
}
