//! Shared fixtures for the behavioral specs.

use assert_cmd::Command;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::Output;
use tempfile::TempDir;

/// Interpreter stand-in: passes the dependency check, then behaves like a
/// notebook that writes a report under `$BASE_DIR/reports`.
pub const FAKE_PYTHON: &str = r#"#!/bin/sh
if [ "$1" = "-c" ]; then exit 0; fi
mkdir -p "$BASE_DIR"
cat > "$BASE_DIR/executed.ipynb"
echo "loading dataset from $BASE_DIR"
echo "warning: slow frame" >&2
mkdir -p "$BASE_DIR/reports/plots"
printf '# Reliability report\n\nscore: 0.98\n' > "$BASE_DIR/reports/report.md"
echo png > "$BASE_DIR/reports/plots/curve.png"
echo "done"
"#;

/// Interpreter without nbclient installed
pub const PYTHON_WITHOUT_NBCLIENT: &str = r#"#!/bin/sh
echo "ModuleNotFoundError: No module named 'nbclient'" >&2
exit 1
"#;

/// Runs cleanly but writes its reports to the wrong place
pub const PYTHON_MISPLACED_REPORTS: &str = r#"#!/bin/sh
if [ "$1" = "-c" ]; then exit 0; fi
cat > /dev/null
echo "wrote results to outputs/reports"
mkdir -p "$BASE_DIR/outputs/reports"
"#;

/// Fails in the middle of a cell
pub const PYTHON_CELL_ERROR: &str = r#"#!/bin/sh
if [ "$1" = "-c" ]; then exit 0; fi
cat > /dev/null
echo "cell 1 ok"
echo "ZeroDivisionError: division by zero" >&2
exit 1
"#;

pub const NOTEBOOK_SCRIPT: &str = "\
from pathlib import Path

BASE = Path('/content/drive')
MAX_VIDEOS = 100
MAX_IMAGES_TOTAL = 5000
SKIP_EXISTING = False

# %%
print(BASE)
";

pub fn notebook_ipynb() -> String {
    serde_json::json!({
        "cells": [
            {"cell_type": "markdown", "metadata": {}, "source": ["# Reliability test\n"]},
            {"cell_type": "code", "metadata": {}, "outputs": [], "execution_count": null,
             "source": ["BASE = Path('/content')\n", "MAX_VIDEOS = 100\n",
                        "MAX_IMAGES_TOTAL = 5000\n", "SKIP_EXISTING = False\n"]}
        ],
        "metadata": {"kernelspec": {"name": "python3"}},
        "nbformat": 4,
        "nbformat_minor": 5
    })
    .to_string()
}

/// A temporary working directory the CLI runs in
pub struct Project {
    dir: TempDir,
}

impl Project {
    pub fn empty() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write a file relative to the project, creating parent directories
    pub fn file(&self, rel: &str, contents: impl AsRef<[u8]>) -> PathBuf {
        let path = self.path().join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&path, contents).unwrap();
        path
    }

    pub fn read(&self, rel: &str) -> String {
        std::fs::read_to_string(self.path().join(rel)).unwrap()
    }

    /// `nbr` running in the project with a clean configuration
    pub fn nbr(&self) -> Cli {
        let mut cmd = Command::cargo_bin("nbr").unwrap();
        cmd.current_dir(self.path())
            .env("XDG_CONFIG_HOME", self.path().join(".config"))
            .env_remove("RUST_LOG");
        for key in [
            "NBR_PYTHON",
            "NBR_PYTHON_ARGS",
            "NBR_KERNEL",
            "NBR_NOTEBOOK",
            "NBR_BASE_ENV",
            "BASE_DIR",
        ] {
            cmd.env_remove(key);
        }
        Cli { cmd }
    }

    /// `nbr` with `script` standing in for the Python interpreter
    pub fn nbr_with_python(&self, script: &str) -> Cli {
        let path = self.file("bin/python.sh", script);
        self.nbr()
            .env("NBR_PYTHON", "/bin/sh")
            .env("NBR_PYTHON_ARGS", path)
    }
}

pub struct Cli {
    cmd: Command,
}

impl Cli {
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.cmd.args(args);
        self
    }

    pub fn env(mut self, key: &str, value: impl AsRef<OsStr>) -> Self {
        self.cmd.env(key, value);
        self
    }

    /// Run and require exit status 0
    pub fn passes(mut self) -> Outcome {
        let output = self.cmd.output().unwrap();
        let outcome = Outcome { output };
        assert!(
            outcome.output.status.success(),
            "expected success\nstdout:\n{}\nstderr:\n{}",
            outcome.stdout(),
            outcome.stderr()
        );
        outcome
    }

    /// Run and require a non-zero exit status
    pub fn fails(mut self) -> Outcome {
        let output = self.cmd.output().unwrap();
        let outcome = Outcome { output };
        assert!(
            !outcome.output.status.success(),
            "expected failure\nstdout:\n{}\nstderr:\n{}",
            outcome.stdout(),
            outcome.stderr()
        );
        outcome
    }
}

pub struct Outcome {
    output: Output,
}

impl Outcome {
    pub fn stdout(&self) -> String {
        String::from_utf8_lossy(&self.output.stdout).into_owned()
    }

    pub fn stderr(&self) -> String {
        String::from_utf8_lossy(&self.output.stderr).into_owned()
    }

    pub fn stdout_has(self, expected: &str) -> Self {
        let stdout = self.stdout();
        assert!(
            stdout.contains(expected),
            "stdout missing {:?}:\n{}",
            expected,
            stdout
        );
        self
    }

    pub fn stderr_has(self, expected: &str) -> Self {
        let stderr = self.stderr();
        assert!(
            stderr.contains(expected),
            "stderr missing {:?}:\n{}",
            expected,
            stderr
        );
        self
    }

    pub fn stdout_lacks(self, unexpected: &str) -> Self {
        let stdout = self.stdout();
        assert!(
            !stdout.contains(unexpected),
            "stdout unexpectedly has {:?}:\n{}",
            unexpected,
            stdout
        );
        self
    }

    pub fn stdout_eq(self, expected: &str) -> Self {
        similar_asserts::assert_eq!(self.stdout(), expected);
        self
    }
}

/// Entry names of a zip archive, in archive order
pub fn zip_entries(path: &Path) -> Vec<String> {
    let file = std::fs::File::open(path).unwrap();
    let archive = zip::ZipArchive::new(file).unwrap();
    archive.file_names().map(String::from).collect()
}
