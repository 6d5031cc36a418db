mod common;

use common::{HR_CSV, TestWorkspace, command};
use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;

#[test]
fn preview_renders_first_rows_as_table() {
    let workspace = TestWorkspace::new();
    workspace.write("4-1.csv", HR_CSV);

    command()
        .args(["preview", "--rows", "2", "--data-dir"])
        .arg(workspace.path())
        .assert()
        .success()
        .stdout(contains("工号"))
        .stdout(contains("GH001"))
        .stdout(contains("GH002").not());
}

#[test]
fn preview_discovers_by_keyword() {
    let workspace = TestWorkspace::new();
    workspace.write("4-1.csv", HR_CSV);
    workspace.write("5-1.tsv", "年份\t年末总人口\n2022年\t141175\n");

    command()
        .args(["preview", "--keyword", "5-1", "--data-dir"])
        .arg(workspace.path())
        .assert()
        .success()
        .stdout(contains("年末总人口"))
        .stdout(contains("141175"));
}

#[test]
fn preview_reports_missing_input() {
    let workspace = TestWorkspace::new();
    command()
        .args(["preview", "--input"])
        .arg(workspace.path().join("nope.csv"))
        .assert()
        .failure()
        .stderr(contains("does not exist"));
}
