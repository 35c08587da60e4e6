//! Patch specs
//!
//! Verify `nbr patch` rewrites the four constants and nothing else.

use crate::prelude::*;

#[test]
fn patch_ipynb_to_stdout() {
    let temp = Project::empty();
    temp.file("reliability_test.ipynb", notebook_ipynb());

    let outcome = temp
        .nbr()
        .args(["patch", "--base-dir", "data", "--max-videos", "3"])
        .passes()
        .stderr_has("patched: BASE, MAX_VIDEOS, MAX_IMAGES_TOTAL, SKIP_EXISTING");

    let nb: serde_json::Value = serde_json::from_str(&outcome.stdout()).unwrap();
    let source: String = nb["cells"][1]["source"]
        .as_array()
        .unwrap()
        .iter()
        .map(|line| line.as_str().unwrap())
        .collect();
    let lines: Vec<&str> = source.lines().collect();
    assert!(lines[0].starts_with("BASE = Path(r\""), "{}", source);
    assert!(lines[0].ends_with("/data\")"), "{}", source);
    assert_eq!(
        &lines[1..],
        ["MAX_VIDEOS = 3", "MAX_IMAGES_TOTAL = None", "SKIP_EXISTING = True"]
    );
    assert_eq!(nb["cells"][0]["source"][0], "# Reliability test\n");
    assert_eq!(nb["metadata"]["kernelspec"]["name"], "python3");

    // Input is untouched
    assert_eq!(temp.read("reliability_test.ipynb"), notebook_ipynb());
}

#[test]
fn patch_script_to_file() {
    let temp = Project::empty();
    temp.file("nb.py", NOTEBOOK_SCRIPT);

    temp.nbr()
        .args([
            "patch",
            "--notebook",
            "nb.py",
            "--base-dir",
            "/srv/data",
            "--max-images",
            "40",
            "--no-skip-existing",
            "--output",
            "patched.py",
        ])
        .passes()
        .stdout_eq("");

    let expected = "\
from pathlib import Path

BASE = Path(r\"/srv/data\")
MAX_VIDEOS = None
MAX_IMAGES_TOTAL = 40
SKIP_EXISTING = False

# %%
print(BASE)
";
    similar_asserts::assert_eq!(temp.read("patched.py"), expected);
}

#[test]
fn patch_reports_missing_variables() {
    let temp = Project::empty();
    temp.file("nb.py", "MAX_VIDEOS = 1\n");

    temp.nbr()
        .args(["patch", "-n", "nb.py", "--base-dir", "/b"])
        .passes()
        .stdout_eq("MAX_VIDEOS = None\n")
        .stderr_has("not found: BASE, MAX_IMAGES_TOTAL, SKIP_EXISTING");
}

#[test]
fn patch_refuses_to_overwrite_input() {
    let temp = Project::empty();
    temp.file("nb.py", NOTEBOOK_SCRIPT);

    temp.nbr()
        .args(["patch", "-n", "nb.py", "--base-dir", "/b", "-o", "./nb.py"])
        .fails()
        .stderr_has("refusing to overwrite");
    assert_eq!(temp.read("nb.py"), NOTEBOOK_SCRIPT);
}

#[test]
fn patch_missing_notebook_suggests_flag() {
    let temp = Project::empty();
    temp.nbr()
        .args(["patch", "--base-dir", "/b"])
        .fails()
        .stderr_has("error: notebook not found: reliability_test.ipynb")
        .stderr_has("--notebook");
}

#[test]
fn patch_uses_notebook_from_env() {
    let temp = Project::empty();
    temp.file("custom.py", "SKIP_EXISTING = False\n");

    temp.nbr()
        .env("NBR_NOTEBOOK", "custom.py")
        .args(["patch", "--base-dir", "/b"])
        .passes()
        .stdout_eq("SKIP_EXISTING = True\n");
}
