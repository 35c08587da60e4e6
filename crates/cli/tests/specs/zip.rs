//! Zip specs
//!
//! Verify `nbr zip` packages a directory with relative entry names.

use crate::prelude::*;

#[test]
fn zip_writes_relative_entries() {
    let temp = Project::empty();
    temp.file("reports/a/b.txt", "b");

    temp.nbr()
        .args(["zip", "reports", "out.zip"])
        .passes()
        .stdout_eq("a/b.txt\n")
        .stderr_has("(1 files)");

    assert_eq!(zip_entries(&temp.path().join("out.zip")), vec!["a/b.txt"]);
}

#[test]
fn zip_lists_files_sorted_as_json() {
    let temp = Project::empty();
    temp.file("reports/z.md", "z");
    temp.file("reports/plots/a.png", "a");

    let outcome = temp
        .nbr()
        .args(["zip", "reports", "out.zip", "--format", "json"])
        .passes();

    let files: Vec<String> = serde_json::from_str(&outcome.stdout()).unwrap();
    assert_eq!(files, vec!["plots/a.png", "z.md"]);
}

#[test]
fn zip_inside_source_skips_itself() {
    let temp = Project::empty();
    temp.file("reports/report.md", "r");

    temp.nbr()
        .args(["zip", "reports", "reports/bundle.zip"])
        .passes()
        .stdout_eq("report.md\n")
        .stderr_has("(1 files)");

    assert_eq!(
        zip_entries(&temp.path().join("reports/bundle.zip")),
        vec!["report.md"]
    );
}

#[test]
fn zip_missing_source_fails() {
    let temp = Project::empty();
    temp.nbr()
        .args(["zip", "nope", "out.zip"])
        .fails()
        .stderr_has("failed to package nope");
    assert!(!temp.path().join("out.zip").exists());
}
