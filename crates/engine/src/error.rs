// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for notebook runs

use nbr_adapters::ExecutorError;
use nbr_core::NotebookError;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that end a run
#[derive(Debug, Error)]
pub enum RunError {
    #[error("notebook not found: {}", .0.display())]
    NotebookNotFound(PathBuf),
    #[error(transparent)]
    Notebook(#[from] NotebookError),
    #[error("missing execution dependency: {detail} (install with `{remedy}`)")]
    MissingDependency { detail: String, remedy: String },
    #[error(transparent)]
    Execution(ExecutorError),
    #[error("{}", reports_missing_message(.expected, .candidates))]
    ReportsMissing {
        expected: PathBuf,
        candidates: Vec<PathBuf>,
    },
}

impl From<ExecutorError> for RunError {
    fn from(err: ExecutorError) -> Self {
        match err {
            ExecutorError::MissingDependency { detail, remedy } => {
                RunError::MissingDependency { detail, remedy }
            }
            other => RunError::Execution(other),
        }
    }
}

fn reports_missing_message(expected: &Path, candidates: &[PathBuf]) -> String {
    let mut message = format!(
        "reports directory was not created; expected {}",
        expected.display()
    );
    if !candidates.is_empty() {
        let found: Vec<String> = candidates.iter().map(|p| p.display().to_string()).collect();
        message.push_str("; found reports directories elsewhere: ");
        message.push_str(&found.join(", "));
    }
    message
}
