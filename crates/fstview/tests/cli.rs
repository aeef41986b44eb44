use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::{TempDir, tempdir};

const TERMINALS: &str = "0.1 0.1 90\n0.9 0.1 20\n0.5 0.9 50\n";
const DUMP: &str = "DEBUG: enumerating\n0 1 2\n\n0 1\n";
const TRANSCRIPT: &str = "\
DEBUG BUDGET: Using environment budget=1000.0
DEBUG OBJ: FST 0: tree_cost=800.0, battery_cost=5.0, combined=805.0
not_covered[1] = 0.0
% fs0: 0 1 2
0.5 0.5 0 T S
EndPlot
not_covered[1] = 0.8
Best bound = 90.0, Best integer = 100.0
";

/// Runs the binary inside `dir` with its config directory pointed at `dir`.
#[allow(deprecated)]
fn fstview(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("fstview").expect("binary");
    cmd.current_dir(dir)
        .env("XDG_CONFIG_HOME", dir.join("config"))
        .env("HOME", dir)
        .env_remove("RUST_LOG")
        .arg("--no-color");
    cmd
}

fn setup_run(transcript: &str) -> TempDir {
    let temp = tempdir().unwrap();
    let root = temp.path();
    fs::write(root.join("terms.txt"), TERMINALS).unwrap();
    fs::write(root.join("fsts.txt"), "opaque").unwrap();
    fs::write(root.join("fsts_dump.txt"), DUMP).unwrap();
    fs::write(root.join("solution.txt"), transcript).unwrap();
    temp
}

fn render(dir: &Path) -> Command {
    let mut cmd = fstview(dir);
    cmd.args([
        "render",
        "--terminals",
        "terms.txt",
        "--fsts",
        "fsts.txt",
        "--solution",
        "solution.txt",
        "--output",
        "report.html",
    ]);
    cmd
}

#[test]
fn render_three_terminal_scenario() {
    let temp = setup_run(TRANSCRIPT);
    render(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Report written to report.html"))
        .stdout(predicate::str::contains("built-in renderer"));

    let html = fs::read_to_string(temp.path().join("report.html")).unwrap();
    assert_eq!(html.matches("<line ").count(), 3);
    assert_eq!(html.matches(r#"<circle class="steiner-point""#).count(), 1);
    assert_eq!(html.matches(r#"<circle class="terminal "#).count(), 3);
    assert_eq!(html.matches(r#"<circle class="terminal uncovered""#).count(), 1);
    assert!(html.contains("10.0000% (0.100000)"));
    assert!(html.contains(r#"<span class="metric-value">1 of 2</span>"#));
    assert!(html.contains(r#"<span class="metric-value">80.0%</span>"#));
    assert!(html.contains("(uncovered: T1)"));
}

#[test]
fn render_with_empty_transcript_shows_unavailable_gap() {
    let temp = setup_run("");
    render(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("MIP gap Not available"));

    let html = fs::read_to_string(temp.path().join("report.html")).unwrap();
    assert!(html.contains(
        r#"<span class="metric-label">MIP Gap</span><span class="metric-value">Not available</span>"#
    ));
    assert!(html.contains(r#"<span class="metric-value">0 of 2</span>"#));
    assert!(!html.contains("<line "));
}

#[test]
fn render_missing_fsts_file_is_fatal() {
    let temp = setup_run(TRANSCRIPT);
    fs::remove_file(temp.path().join("fsts.txt")).unwrap();
    render(temp.path())
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Error:"))
        .stderr(predicate::str::contains("fsts.txt"));
    assert!(!temp.path().join("report.html").exists());
}

#[test]
fn render_missing_dump_names_the_path() {
    let temp = setup_run(TRANSCRIPT);
    fs::remove_file(temp.path().join("fsts_dump.txt")).unwrap();
    render(temp.path())
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("fsts_dump.txt"));
}

#[test]
fn render_unwritable_output_is_fatal() {
    let temp = setup_run(TRANSCRIPT);
    let mut cmd = fstview(temp.path());
    cmd.args([
        "render",
        "--terminals",
        "terms.txt",
        "--fsts",
        "fsts.txt",
        "--solution",
        "solution.txt",
        "--output",
        "no/such/dir/report.html",
    ])
    .assert()
    .failure()
    .code(1)
    .stderr(predicate::str::contains("report.html"));
}

#[cfg(unix)]
#[test]
fn render_delegates_to_configured_generator() {
    let temp = setup_run(TRANSCRIPT);
    fs::write(
        temp.path().join("gen.sh"),
        "echo \"<html>delegated $2</html>\" > \"$8\"\n",
    )
    .unwrap();
    fstview(temp.path())
        .args(["config", "set", "render.generator", "gen.sh"])
        .assert()
        .success();
    fstview(temp.path())
        .args(["config", "set", "render.generator_interpreter", "sh"])
        .assert()
        .success();

    render(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("external generator"));
    let html = fs::read_to_string(temp.path().join("report.html")).unwrap();
    assert_eq!(html.trim(), "<html>delegated terms.txt</html>");

    render(temp.path())
        .arg("--no-generator")
        .assert()
        .success()
        .stdout(predicate::str::contains("built-in renderer"));
}

#[cfg(unix)]
#[test]
fn render_falls_back_when_generator_fails() {
    let temp = setup_run(TRANSCRIPT);
    fs::write(temp.path().join("html_generator.py"), "exit 2\n").unwrap();
    fstview(temp.path())
        .args(["config", "set", "render.generator_interpreter", "sh"])
        .assert()
        .success();

    render(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("built-in renderer"));
    let html = fs::read_to_string(temp.path().join("report.html")).unwrap();
    assert!(html.contains("Selected FST Details"));
}

#[test]
fn gap_prints_final_gap() {
    let temp = setup_run(TRANSCRIPT);
    fstview(temp.path())
        .args(["gap", "solution.txt"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Final MIP Gap: 10.0000% (0.100000)"));
}

#[test]
fn gap_on_empty_transcript_warns_and_succeeds() {
    let temp = setup_run("");
    fstview(temp.path())
        .args(["gap", "solution.txt"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Could not parse MIP gap"));
}

#[test]
fn gap_on_missing_file_fails() {
    let temp = tempdir().unwrap();
    fstview(temp.path())
        .args(["gap", "absent.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("absent.txt"));
}

#[test]
fn inspect_reports_costs_and_coverage() {
    let transcript = format!(
        "DEBUG P1READ: Terminal 0 battery=90.0\nDEBUG P1READ: Terminal 1 battery=30.0\n{TRANSCRIPT}"
    );
    let temp = setup_run(&transcript);
    fstview(temp.path())
        .args(["inspect", "solution.txt"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Average battery: 60.0%"))
        .stdout(predicate::str::contains("FEASIBLE"))
        .stdout(predicate::str::contains("Budget: 1,000"))
        .stdout(predicate::str::contains("Selected FSTs: 0"))
        .stdout(predicate::str::contains("0 covered, 1 uncovered"));

    fstview(temp.path())
        .args(["inspect", "solution.txt", "--budget", "500"])
        .assert()
        .success()
        .stdout(predicate::str::contains("EXCEEDS"));
}

#[test]
fn config_set_rejects_unknown_key() {
    let temp = tempdir().unwrap();
    fstview(temp.path())
        .args(["config", "set", "render.colour", "red"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown config key"));
}

#[test]
fn config_show_lists_defaults() {
    let temp = tempdir().unwrap();
    fstview(temp.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("render.generator"))
        .stdout(predicate::str::contains("html_generator.py"));
}

#[test]
fn completion_generates_script() {
    let temp = tempdir().unwrap();
    fstview(temp.path())
        .args(["completion", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("fstview"));
}
