//! Run specs
//!
//! Verify `nbr run` patches, executes and verifies the reports directory.

use crate::prelude::*;

#[test]
fn run_prints_log_and_reports_path() {
    let temp = Project::empty();
    temp.file("nb/reliability_test.ipynb", notebook_ipynb());
    std::fs::create_dir_all(temp.path().join("base")).unwrap();

    temp.nbr_with_python(FAKE_PYTHON)
        .args([
            "run",
            "--notebook",
            "nb/reliability_test.ipynb",
            "--base-dir",
            "base",
            "--max-videos",
            "2",
        ])
        .passes()
        .stdout_has("loading dataset from ")
        .stdout_has("warning: slow frame\n")
        .stdout_has("done\n")
        .stdout_has("reports: base/reports");

    assert!(temp.path().join("base/reports/report.md").is_file());

    // The interpreter received the patched notebook
    let executed: serde_json::Value =
        serde_json::from_str(&temp.read("base/executed.ipynb")).unwrap();
    let source = executed["cells"][1]["source"].to_string();
    assert!(source.contains("MAX_VIDEOS = 2"), "{}", source);
    assert!(source.contains("SKIP_EXISTING = True"), "{}", source);
}

#[test]
fn run_reads_interpreter_from_config_file() {
    let temp = Project::empty();
    temp.file("reliability_test.ipynb", notebook_ipynb());
    let script = temp.file("bin/python.sh", FAKE_PYTHON);
    temp.file(
        ".config/nbr/config.toml",
        format!(
            "python = \"/bin/sh\"\npython_args = [\"{}\"]\n",
            script.display()
        ),
    );

    temp.nbr()
        .args(["run", "--base-dir", "base"])
        .passes()
        .stdout_has("reports: base/reports");
}

#[test]
fn run_missing_notebook_fails_before_execution() {
    let temp = Project::empty();
    temp.nbr_with_python(FAKE_PYTHON)
        .args(["run", "-n", "absent.ipynb", "--base-dir", "base"])
        .fails()
        .stderr_has("error: notebook not found: absent.ipynb");
    assert!(!temp.path().join("base").exists());
}

#[test]
fn run_missing_dependency_names_remedy() {
    let temp = Project::empty();
    temp.file("reliability_test.ipynb", notebook_ipynb());

    temp.nbr_with_python(PYTHON_WITHOUT_NBCLIENT)
        .args(["run", "--base-dir", "base"])
        .fails()
        .stderr_has("error: notebook execution dependencies are missing")
        .stderr_has("No module named 'nbclient'")
        .stderr_has("pip install nbformat nbclient");
}

#[test]
fn run_lists_misplaced_reports() {
    let temp = Project::empty();
    temp.file("reliability_test.ipynb", notebook_ipynb());

    temp.nbr_with_python(PYTHON_MISPLACED_REPORTS)
        .args(["run", "--base-dir", "base"])
        .fails()
        .stderr_has("error: reports directory was not created")
        .stderr_has("outputs/reports");
}

#[test]
fn run_cell_failure_shows_output() {
    let temp = Project::empty();
    temp.file("reliability_test.ipynb", notebook_ipynb());

    temp.nbr_with_python(PYTHON_CELL_ERROR)
        .args(["run", "--base-dir", "base"])
        .fails()
        .stderr_has("notebook execution failed (exit status 1)")
        .stderr_has("-> cell 1 ok")
        .stderr_has("-> ZeroDivisionError: division by zero");
}

#[test]
fn run_honours_custom_base_env() {
    let temp = Project::empty();
    temp.file("reliability_test.ipynb", notebook_ipynb());
    let script = FAKE_PYTHON.replace("$BASE_DIR", "$DATA_ROOT");

    temp.nbr_with_python(&script)
        .env("NBR_BASE_ENV", "DATA_ROOT")
        .args(["run", "--base-dir", "base"])
        .passes()
        .stdout_has("reports: base/reports");
}
