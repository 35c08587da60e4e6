//! Evaluate specs
//!
//! Verify `nbr evaluate` stages uploads, runs the notebook and packages
//! the reports into an archive.

use crate::prelude::*;

fn uploads(temp: &Project) {
    temp.file("uploads/clip_01.mp4", "video-1");
    temp.file("uploads/clip_02.mp4", "video-2");
    temp.file("uploads/labels/clip_01.json", "{}");
}

#[test]
fn evaluate_packages_reports() {
    let temp = Project::empty();
    temp.file("reliability_test.ipynb", notebook_ipynb());
    uploads(&temp);

    temp.nbr_with_python(FAKE_PYTHON)
        .args([
            "evaluate",
            "--video",
            "uploads/clip_01.mp4",
            "uploads/clip_02.mp4",
            "--label",
            "uploads/labels/clip_01.json",
            "--max-videos",
            "1",
        ])
        .passes()
        .stdout_has("staged 2 video(s) and 1 label file(s)")
        .stdout_has("== log ==\nloading dataset from ")
        .stdout_has("== report.md ==\n# Reliability report\n\nscore: 0.98\n")
        .stdout_has("== files ==\nplots/curve.png\nreport.md\n")
        .stdout_has("archive: reports.zip");

    let mut entries = zip_entries(&temp.path().join("reports.zip"));
    entries.sort();
    assert_eq!(entries, vec!["plots/curve.png", "report.md"]);
}

#[test]
fn evaluate_writes_archive_to_out() {
    let temp = Project::empty();
    temp.file("reliability_test.ipynb", notebook_ipynb());
    uploads(&temp);

    let outcome = temp
        .nbr_with_python(FAKE_PYTHON)
        .args([
            "evaluate",
            "--video",
            "uploads/clip_01.mp4",
            "--label",
            "uploads/labels/clip_01.json",
            "--out",
            "results/run1.zip",
            "--format",
            "json",
        ])
        .passes();

    let summary: serde_json::Value = serde_json::from_str(&outcome.stdout()).unwrap();
    assert_eq!(summary["videos"], 1);
    assert_eq!(summary["labels"], 1);
    assert_eq!(summary["archive"], "results/run1.zip");
    assert_eq!(summary["files"], serde_json::json!(["plots/curve.png", "report.md"]));
    let log = summary["log"].as_array().unwrap();
    assert!(log.contains(&serde_json::Value::from("done")), "{:?}", log);
    assert!(temp.path().join("results/run1.zip").is_file());
    assert!(!temp.path().join("reports.zip").exists());
}

#[test]
fn evaluate_requires_labels() {
    let temp = Project::empty();
    uploads(&temp);

    temp.nbr()
        .args(["evaluate", "--video", "uploads/clip_01.mp4"])
        .fails()
        .stderr_has("--label");
}

#[test]
fn evaluate_requires_videos() {
    let temp = Project::empty();
    uploads(&temp);

    temp.nbr()
        .args(["evaluate", "--label", "uploads/labels/clip_01.json"])
        .fails()
        .stderr_has("--video");
}

#[test]
fn evaluate_missing_upload_fails() {
    let temp = Project::empty();
    temp.file("reliability_test.ipynb", notebook_ipynb());

    temp.nbr_with_python(FAKE_PYTHON)
        .args([
            "evaluate",
            "--video",
            "uploads/gone.mp4",
            "--label",
            "uploads/gone.json",
        ])
        .fails()
        .stderr_has("failed to stage uploads");
    assert!(!temp.path().join("reports.zip").exists());
}

#[test]
fn evaluate_failed_run_writes_no_archive() {
    let temp = Project::empty();
    temp.file("reliability_test.ipynb", notebook_ipynb());
    uploads(&temp);

    temp.nbr_with_python(PYTHON_MISPLACED_REPORTS)
        .args([
            "evaluate",
            "--video",
            "uploads/clip_01.mp4",
            "--label",
            "uploads/labels/clip_01.json",
        ])
        .fails()
        .stderr_has("reports directory was not created");
    assert!(!temp.path().join("reports.zip").exists());
}

#[test]
fn evaluate_failed_run_prints_notebook_log() {
    let temp = Project::empty();
    temp.file("reliability_test.ipynb", notebook_ipynb());
    uploads(&temp);

    temp.nbr_with_python(PYTHON_MISPLACED_REPORTS)
        .args([
            "evaluate",
            "--video",
            "uploads/clip_01.mp4",
            "--label",
            "uploads/labels/clip_01.json",
        ])
        .fails()
        .stderr_has("== log ==\nwrote results to outputs/reports\n")
        .stderr_has("reports directory was not created")
        .stdout_lacks("== log ==");
}
