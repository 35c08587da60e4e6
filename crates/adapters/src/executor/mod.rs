// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Notebook execution adapters

mod nbclient;

pub use nbclient::{NbClientExecutor, MISSING_DEPENDENCY_EXIT};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{ExecutorCall, FakeAction, FakeExecutor};

use async_trait::async_trait;
use nbr_core::{Notebook, NotebookError};
use std::path::PathBuf;
use thiserror::Error;

/// How to install what the Python executor needs
pub const INSTALL_REMEDY: &str = "pip install nbformat nbclient";

/// Errors from notebook execution
#[derive(Debug, Error)]
pub enum ExecutorError {
    #[error("missing execution dependency: {detail} (install with `{remedy}`)")]
    MissingDependency { detail: String, remedy: String },
    #[error("failed to start interpreter: {0}")]
    SpawnFailed(String),
    #[error("notebook execution failed ({}):\n{output}", exit_label(.status))]
    Failed { status: Option<i32>, output: String },
    #[error("failed to encode notebook: {0}")]
    Encode(#[from] NotebookError),
    #[error("interpreter I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ExecutorError {
    pub fn missing_dependency(detail: impl Into<String>) -> Self {
        ExecutorError::MissingDependency {
            detail: detail.into(),
            remedy: INSTALL_REMEDY.to_string(),
        }
    }
}

fn exit_label(status: &Option<i32>) -> String {
    match status {
        Some(code) => format!("exit status {}", code),
        None => "terminated by signal".to_string(),
    }
}

/// Where and with what environment a notebook runs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionContext {
    /// Absolute base directory the notebook reads from and writes to
    pub base_dir: PathBuf,
    /// Kernel working directory, normally the notebook's own directory
    pub working_dir: PathBuf,
    /// Extra environment passed to the execution
    pub env: Vec<(String, String)>,
}

/// Combined stdout and stderr of a completed execution, in arrival order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionOutput {
    pub log: String,
}

impl ExecutionOutput {
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.log.lines()
    }
}

/// Runs every cell of a notebook to completion
#[async_trait]
pub trait NotebookExecutor: Clone + Send + Sync + 'static {
    /// Verify the execution facility is installed
    async fn check(&self) -> Result<(), ExecutorError>;

    /// Execute all cells in order with no timeout
    async fn execute(
        &self,
        notebook: &Notebook,
        context: &ExecutionContext,
    ) -> Result<ExecutionOutput, ExecutorError>;
}
