// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Python `nbclient` executor
//!
//! The patched notebook is piped as JSON into a Python child process running
//! a small bootstrap that drives `nbclient`. The bootstrap merges stderr into
//! stdout so the captured log keeps arrival order, echoes every cell's stream
//! output once execution ends, and exits with [`MISSING_DEPENDENCY_EXIT`]
//! when `nbformat` or `nbclient` cannot be imported.

use super::{ExecutionContext, ExecutionOutput, ExecutorError, NotebookExecutor};
use async_trait::async_trait;
use nbr_core::Notebook;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

/// Exit code the bootstrap uses for a failed import
pub const MISSING_DEPENDENCY_EXIT: i32 = 3;

const BOOTSTRAP: &str = include_str!("bootstrap.py");

const IMPORT_CHECK: &str = "import nbformat, nbclient";

/// Executes notebooks through a Python interpreter with nbclient installed
#[derive(Debug, Clone)]
pub struct NbClientExecutor {
    python: String,
    python_args: Vec<String>,
    kernel: String,
}

impl Default for NbClientExecutor {
    fn default() -> Self {
        Self::new("python3")
    }
}

impl NbClientExecutor {
    pub fn new(python: impl Into<String>) -> Self {
        Self {
            python: python.into(),
            python_args: Vec::new(),
            kernel: "python3".to_string(),
        }
    }

    /// Arguments placed before the interpreter's own, e.g. `run python` for a launcher
    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.python_args = args;
        self
    }

    pub fn with_kernel(mut self, kernel: impl Into<String>) -> Self {
        self.kernel = kernel.into();
        self
    }

    pub fn python(&self) -> &str {
        &self.python
    }

    pub fn kernel(&self) -> &str {
        &self.kernel
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.python);
        cmd.args(&self.python_args);
        cmd
    }

    fn spawn_error(&self, e: std::io::Error) -> ExecutorError {
        ExecutorError::SpawnFailed(format!("{}: {}", self.python, e))
    }
}

#[async_trait]
impl NotebookExecutor for NbClientExecutor {
    async fn check(&self) -> Result<(), ExecutorError> {
        let output = self
            .command()
            .arg("-c")
            .arg(IMPORT_CHECK)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| self.spawn_error(e))?;

        if output.status.success() {
            return Ok(());
        }
        let stderr = String::from_utf8_lossy(&output.stderr);
        Err(ExecutorError::missing_dependency(last_line(&stderr).unwrap_or(
            "nbformat/nbclient could not be imported",
        )))
    }

    async fn execute(
        &self,
        notebook: &Notebook,
        context: &ExecutionContext,
    ) -> Result<ExecutionOutput, ExecutorError> {
        let json = notebook.to_json()?;

        let mut child = self
            .command()
            .arg("-u")
            .arg("-c")
            .arg(BOOTSTRAP)
            .arg(&self.kernel)
            .arg(&context.working_dir)
            .current_dir(&context.working_dir)
            .envs(context.env.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| self.spawn_error(e))?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| ExecutorError::SpawnFailed("interpreter stdin unavailable".to_string()))?;

        // Feed stdin while the output is drained so neither pipe can fill up
        let feed = async move {
            let result = stdin.write_all(json.as_bytes()).await;
            drop(stdin);
            result
        };
        let (fed, output) = tokio::join!(feed, child.wait_with_output());
        let output = output?;

        let mut log = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr);
        if !stderr.is_empty() {
            if !log.is_empty() && !log.ends_with('\n') {
                log.push('\n');
            }
            log.push_str(&stderr);
        }

        match output.status.code() {
            Some(0) => {
                // A child that exits cleanly without reading stdin is not an error
                if let Err(e) = fed {
                    tracing::debug!(error = %e, "interpreter closed stdin early");
                }
                Ok(ExecutionOutput { log })
            }
            Some(MISSING_DEPENDENCY_EXIT) => Err(ExecutorError::missing_dependency(
                last_line(&log).unwrap_or("nbformat/nbclient could not be imported"),
            )),
            status => Err(ExecutorError::Failed {
                status,
                output: log,
            }),
        }
    }
}

fn last_line(text: &str) -> Option<&str> {
    text.lines().rev().map(str::trim).find(|l| !l.is_empty())
}

#[cfg(test)]
#[path = "nbclient_tests.rs"]
mod tests;
