// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! User-friendly error display with context and suggestions.
//!
//! This module provides enhanced error types that include:
//! - What went wrong (message)
//! - Why it might have happened (context)
//! - How to fix it (suggestions)

use nbr_adapters::ExecutorError;
use nbr_engine::RunError;
use std::fmt;
use std::path::{Path, PathBuf};

/// Lines of interpreter output kept in a failure report
const FAILURE_TAIL: usize = 20;

/// Error with context and recovery suggestions for user-friendly display.
#[derive(Debug)]
pub struct CliError {
    /// What went wrong
    pub message: String,
    /// Why it might have happened
    pub context: Vec<String>,
    /// How to fix it
    pub suggestions: Vec<String>,
    /// Original error if any
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl CliError {
    /// Create a new error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            context: Vec::new(),
            suggestions: Vec::new(),
            source: None,
        }
    }

    /// Add context about why this error might have happened.
    pub fn with_context(mut self, ctx: impl Into<String>) -> Self {
        self.context.push(ctx.into());
        self
    }

    /// Add a suggestion for how to fix this error.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    /// Set the source error that caused this error.
    pub fn with_source<E: std::error::Error + Send + Sync + 'static>(mut self, source: E) -> Self {
        self.source = Some(Box::new(source));
        self
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "error: {}", self.message)?;

        if !self.context.is_empty() {
            writeln!(f)?;
            for ctx in &self.context {
                writeln!(f, "  -> {}", ctx)?;
            }
        }

        if !self.suggestions.is_empty() {
            writeln!(f)?;
            writeln!(f, "suggestions:")?;
            for (i, suggestion) in self.suggestions.iter().enumerate() {
                writeln!(f, "  {}. {}", i + 1, suggestion)?;
            }
        }

        Ok(())
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Common error builders for typical failure scenarios.
impl CliError {
    /// The notebook path does not point at a file.
    pub fn notebook_not_found(path: &Path) -> Self {
        CliError::new(format!("notebook not found: {}", path.display()))
            .with_context("Relative paths are resolved against the current directory")
            .with_suggestion("Pass the notebook explicitly: nbr run --notebook <PATH>")
            .with_suggestion("Set `notebook` in config.toml or NBR_NOTEBOOK")
    }

    /// nbformat or nbclient cannot be imported by the configured interpreter.
    pub fn missing_dependency(detail: &str, remedy: &str) -> Self {
        CliError::new("notebook execution dependencies are missing")
            .with_context(detail.to_string())
            .with_suggestion(format!("Install them: {}", remedy))
            .with_suggestion("Use another interpreter: --python <PATH> or NBR_PYTHON")
    }

    /// The notebook ran but `<base>/reports` does not exist.
    pub fn reports_missing(expected: &Path, candidates: &[PathBuf]) -> Self {
        let mut err = CliError::new(format!(
            "reports directory was not created: {}",
            expected.display()
        ));
        if candidates.is_empty() {
            err = err.with_context("The notebook produced no reports directory at all");
        } else {
            for candidate in candidates {
                err = err.with_context(format!("found reports directory at {}", candidate.display()));
            }
        }
        err.with_suggestion("Write results under BASE / \"reports\" in the notebook")
            .with_suggestion("Check the notebook reads BASE or the BASE_DIR environment variable")
    }

    /// The interpreter exited unsuccessfully while running cells.
    pub fn execution_failed(status: Option<i32>, output: &str) -> Self {
        let status = match status {
            Some(code) => format!("exit status {}", code),
            None => "terminated by signal".to_string(),
        };
        let lines: Vec<&str> = output.lines().collect();
        let tail = &lines[lines.len().saturating_sub(FAILURE_TAIL)..];

        let mut err = CliError::new(format!("notebook execution failed ({})", status));
        for line in tail {
            err = err.with_context(*line);
        }
        err.with_suggestion("Run the notebook interactively to reproduce the failing cell")
            .with_suggestion("Re-run with -v for timing and interpreter details")
    }
}

impl From<RunError> for CliError {
    fn from(err: RunError) -> Self {
        match err {
            RunError::NotebookNotFound(path) => CliError::notebook_not_found(&path),
            RunError::MissingDependency { detail, remedy } => {
                CliError::missing_dependency(&detail, &remedy)
            }
            RunError::ReportsMissing {
                expected,
                candidates,
            } => CliError::reports_missing(&expected, &candidates),
            RunError::Execution(ExecutorError::Failed { status, output }) => {
                CliError::execution_failed(status, &output)
            }
            other => CliError::new(other.to_string()).with_source(other),
        }
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
