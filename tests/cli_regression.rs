//! Regression tests for the sycheck binary surface.
//! Requires: assert_cmd, predicates crates in [dev-dependencies]

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::{prelude::PredicateBooleanExt, str::contains};
use tempfile::TempDir;

fn write_case(dir: &Path, id: &str, source: &str, expected: &str) {
    fs::write(dir.join(format!("{id}.sy")), source).unwrap();
    fs::write(dir.join(format!("{id}.out")), expected).unwrap();
}

fn sycheck() -> Command {
    Command::cargo_bin("sycheck").unwrap()
}

#[test]
fn list_prints_selected_ids_in_order() {
    let tmp = TempDir::new().unwrap();
    write_case(tmp.path(), "010_first", "", "0\n");
    write_case(tmp.path(), "020_second", "", "0\n");
    write_case(tmp.path(), "030_third", "", "0\n");

    sycheck()
        .arg("list")
        .arg(tmp.path())
        .args(["--from", "010", "--to", "030"])
        .assert()
        .success()
        .stdout("010_first\n020_second\n");
}

#[test]
fn list_applies_prefix_and_exclusion() {
    let tmp = TempDir::new().unwrap();
    write_case(tmp.path(), "320_io", "", "0\n");
    write_case(tmp.path(), "321_io", "", "0\n");
    write_case(tmp.path(), "400_other", "", "0\n");

    sycheck()
        .arg("list")
        .arg(tmp.path())
        .args(["--prefix", "32", "--exclude", "320_io"])
        .assert()
        .success()
        .stdout("321_io\n");
}

#[test]
fn missing_corpus_directory_is_an_error() {
    let tmp = TempDir::new().unwrap();
    sycheck()
        .arg("list")
        .arg(tmp.path().join("no-such-dir"))
        .assert()
        .failure()
        .stderr(contains("Error:"));
}

#[test]
fn orphan_case_without_recording_fails_selection() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("050_orphan.sy"), "").unwrap();

    sycheck()
        .arg("list")
        .arg(tmp.path())
        .assert()
        .failure()
        .stderr(contains("no expected-output file"));
}

/// A "toolchain" whose compiler run just prints the source file: every
/// case's source doubles as its own expected stdout.
#[cfg(unix)]
fn write_direct_config(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("toolchain.yaml");
    let work_dir = dir.join("work");
    fs::write(
        &path,
        format!(
            "mode: direct\ncompiler:\n  program: sh\n  args: [\"-c\", 'cat \"$0\"']\nwork_dir: {}\n",
            work_dir.display()
        ),
    )
    .unwrap();
    path
}

#[cfg(unix)]
#[test]
fn run_reports_correct_cases_and_exits_zero() {
    let tmp = TempDir::new().unwrap();
    write_case(tmp.path(), "t1", "7\n", "7\n0");
    let config = write_direct_config(tmp.path());

    sycheck()
        .arg("run")
        .arg(tmp.path())
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .stdout(contains("testing : t1").and(contains("correct")));
}

#[cfg(unix)]
#[test]
fn run_halts_on_mismatch_and_prints_sentinel_values() {
    let tmp = TempDir::new().unwrap();
    write_case(tmp.path(), "t1", "7\n", "7\n0");
    write_case(tmp.path(), "t2", "uh-oh\n", "fine\n0");
    write_case(tmp.path(), "t3", "9\n", "9\n0");

    let config = write_direct_config(tmp.path());
    let assert = sycheck()
        .arg("run")
        .arg(tmp.path())
        .arg("--config")
        .arg(&config)
        .assert()
        .failure();

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    assert!(stdout.contains("wrong"));
    assert!(stdout.contains(">uh-oh<"));
    assert!(stdout.contains(">fine<"));
    // Fail-fast: t3 never starts.
    assert!(!stdout.contains("testing : t3"));
}

#[cfg(unix)]
#[test]
fn keep_going_checks_the_whole_corpus() {
    let tmp = TempDir::new().unwrap();
    write_case(tmp.path(), "t1", "bad\n", "good\n0");
    write_case(tmp.path(), "t2", "9\n", "9\n0");

    let config = write_direct_config(tmp.path());
    sycheck()
        .arg("run")
        .arg(tmp.path())
        .arg("--config")
        .arg(&config)
        .arg("--keep-going")
        .assert()
        .failure()
        .stdout(contains("testing : t2").and(contains("1 correct, 1 wrong")));
}

#[cfg(unix)]
#[test]
fn json_report_records_each_case() {
    let tmp = TempDir::new().unwrap();
    write_case(tmp.path(), "t1", "7\n", "7\n0");
    let config = write_direct_config(tmp.path());
    let report_path = tmp.path().join("report.json");

    sycheck()
        .arg("run")
        .arg(tmp.path())
        .arg("--config")
        .arg(&config)
        .arg("--json")
        .arg(&report_path)
        .assert()
        .success();

    let report = fs::read_to_string(&report_path).unwrap();
    assert!(report.contains("\"status\": \"pass\""));
    assert!(report.contains("\"passed\": 1"));
}

#[test]
fn suite_flag_selects_a_corpus_subset() {
    let tmp = TempDir::new().unwrap();
    let functional = tmp.path().join("functional");
    let performance = tmp.path().join("performance");
    fs::create_dir(&functional).unwrap();
    fs::create_dir(&performance).unwrap();
    write_case(&functional, "001_fn", "", "0\n");
    write_case(&performance, "001_perf", "", "0\n");

    sycheck()
        .arg("list")
        .arg(tmp.path())
        .args(["--suite", "functional"])
        .assert()
        .success()
        .stdout("001_fn\n");
}
