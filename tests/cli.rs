//! CLI integration tests

use std::io::Write;

use assert_cmd::Command;
use predicates::prelude::*;

fn tabchart() -> Command {
    Command::cargo_bin("tabchart").unwrap()
}

fn sample_csv(dir: &std::path::Path) -> std::path::PathBuf {
    let path = dir.join("apps.csv");
    let mut f = std::fs::File::create(&path).unwrap();
    f.write_all(b"app,category,rating\nmaps,travel,4.5\nmail,work,3.9\ncalc,work,2.1\nchat,social,4.1\n")
        .unwrap();
    path
}

#[test]
fn missing_file_reports_not_found() {
    tabchart()
        .arg("no/such/file.csv")
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn default_action_is_a_preview() {
    let dir = tempfile::tempdir().unwrap();
    let input = sample_csv(dir.path());

    tabchart()
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("4 rows x 3 columns"))
        .stdout(predicate::str::contains("rating"));
}

#[test]
fn scatter_chart_is_written_to_disk() {
    let dir = tempfile::tempdir().unwrap();
    let input = sample_csv(dir.path());
    let out = dir.path().join("chart.svg");

    tabchart()
        .arg(&input)
        .args(["--chart", "scatter", "-x", "rating", "-y", "rating"])
        .arg("-o")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("wrote"));

    let svg = std::fs::read_to_string(&out).unwrap();
    assert!(svg.starts_with("<svg"));
}

#[test]
fn grouped_bar_chart_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let input = sample_csv(dir.path());
    let out = dir.path().join("by_category.svg");

    tabchart()
        .arg(&input)
        .args(["--group-by", "category", "--agg", "mean:rating"])
        .args(["--chart", "bar", "-x", "category", "-y", "mean_rating"])
        .arg("-o")
        .arg(&out)
        .assert()
        .success();

    let svg = std::fs::read_to_string(&out).unwrap();
    // One bar per category
    assert_eq!(svg.matches("fill=\"#1f77b4\"").count(), 3);
}

#[test]
fn describe_prints_summary_statistics() {
    let dir = tempfile::tempdir().unwrap();
    let input = sample_csv(dir.path());

    tabchart()
        .arg(&input)
        .arg("--describe")
        .assert()
        .success()
        .stdout(predicate::str::contains("distinct"))
        .stdout(predicate::str::contains("rating"));
}

#[test]
fn bad_filter_expression_fails() {
    let dir = tempfile::tempdir().unwrap();
    let input = sample_csv(dir.path());

    tabchart()
        .arg(&input)
        .args(["--filter", "rating about 4"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("operator"));
}

#[test]
fn filter_on_missing_column_fails() {
    let dir = tempfile::tempdir().unwrap();
    let input = sample_csv(dir.path());

    tabchart()
        .arg(&input)
        .args(["--filter", "downloads > 10"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("column not found: downloads"));
}

#[test]
fn export_writes_transformed_table() {
    let dir = tempfile::tempdir().unwrap();
    let input = sample_csv(dir.path());
    let out = dir.path().join("filtered.csv");

    tabchart()
        .arg(&input)
        .args(["--filter", "rating >= 4"])
        .arg("--export")
        .arg(&out)
        .assert()
        .success();

    let content = std::fs::read_to_string(&out).unwrap();
    assert_eq!(content.lines().count(), 3); // header + two rows
    assert!(content.contains("maps"));
    assert!(!content.contains("calc"));
}
