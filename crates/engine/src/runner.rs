// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Notebook runner
//!
//! One run is strictly sequential:
//! 1. check the notebook exists and the executor's dependencies are present
//! 2. load and patch the notebook in memory
//! 3. execute every cell with the base directory exposed in the environment
//! 4. replay the captured log to the observer
//! 5. verify `<base>/reports` exists
//!
//! Nothing is retried. Execution failures propagate unchanged.

use crate::error::RunError;
use nbr_adapters::{ExecutionContext, NotebookExecutor};
use nbr_core::{
    patch_notebook, patch_source, DatasetLayout, Notebook, NotebookError, NotebookFormat,
    PatchReport, PatchValues, ScopedEnv, BASE_DIR_ENV,
};
use std::path::{Path, PathBuf};
use tracing::Instrument;

/// Runner settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunnerConfig {
    /// Environment variable that carries the base directory during execution
    pub env_var: String,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            env_var: BASE_DIR_ENV.to_string(),
        }
    }
}

/// What to run and with which values
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunRequest {
    pub notebook: PathBuf,
    pub values: PatchValues,
}

impl RunRequest {
    pub fn new(notebook: impl Into<PathBuf>, values: PatchValues) -> Self {
        Self {
            notebook: notebook.into(),
            values,
        }
    }
}

/// Drives a notebook through an executor
pub struct Runner<E> {
    executor: E,
    config: RunnerConfig,
}

impl<E: NotebookExecutor> Runner<E> {
    pub fn new(executor: E) -> Self {
        Self::with_config(executor, RunnerConfig::default())
    }

    pub fn with_config(executor: E, config: RunnerConfig) -> Self {
        Self { executor, config }
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    /// Run the notebook and return the verified reports directory
    ///
    /// `on_log` receives each captured output line, without its line break,
    /// after execution has finished.
    pub async fn run(
        &self,
        request: &RunRequest,
        on_log: Option<&mut (dyn FnMut(&str) + Send)>,
    ) -> Result<PathBuf, RunError> {
        let run_id = uuid::Uuid::new_v4().to_string();
        let span = tracing::info_span!(
            "run",
            run_id = %run_id,
            notebook = %request.notebook.display(),
            base_dir = %request.values.base_dir.display(),
        );
        self.run_inner(request, on_log).instrument(span).await
    }

    async fn run_inner(
        &self,
        request: &RunRequest,
        on_log: Option<&mut (dyn FnMut(&str) + Send)>,
    ) -> Result<PathBuf, RunError> {
        if !request.notebook.is_file() {
            return Err(RunError::NotebookNotFound(request.notebook.clone()));
        }

        self.executor.check().await?;

        let (notebook, report) = load_patched(&request.notebook, &request.values)?;
        for variable in report.missing() {
            tracing::warn!(%variable, "variable not found in notebook; left unpatched");
        }

        let base_dir = absolute(&request.values.base_dir);
        let context = ExecutionContext {
            base_dir: base_dir.clone(),
            working_dir: working_dir(&request.notebook),
            env: vec![(self.config.env_var.clone(), base_dir.display().to_string())],
        };

        tracing::info!(
            cells = notebook.cells.len(),
            working_dir = %context.working_dir.display(),
            "executing notebook"
        );
        let output = {
            let _env = ScopedEnv::set(&self.config.env_var, &base_dir);
            self.executor.execute(&notebook, &context).await?
        };

        if let Some(sink) = on_log {
            for line in output.lines() {
                sink(line);
            }
        }

        let layout = DatasetLayout::new(&request.values.base_dir);
        let reports = layout.reports_dir();
        if !reports.is_dir() {
            let candidates = layout.reports_candidates();
            tracing::error!(
                expected = %reports.display(),
                candidates = candidates.len(),
                "reports directory missing"
            );
            return Err(RunError::ReportsMissing {
                expected: reports,
                candidates,
            });
        }

        tracing::info!(reports = %reports.display(), "run complete");
        Ok(reports)
    }
}

/// Load a notebook and patch it in memory
///
/// `.ipynb` files are patched per code cell; scripts are patched as flat text
/// before being split into cells.
pub fn load_patched(path: &Path, values: &PatchValues) -> Result<(Notebook, PatchReport), RunError> {
    match NotebookFormat::from_path(path) {
        NotebookFormat::Ipynb => {
            let mut notebook = Notebook::load(path)?;
            let report = patch_notebook(&mut notebook, values);
            Ok((notebook, report))
        }
        NotebookFormat::Script => {
            let bytes = std::fs::read(path).map_err(|source| NotebookError::Read {
                path: path.to_path_buf(),
                source,
            })?;
            let (patched, report) = patch_source(&String::from_utf8_lossy(&bytes), values);
            Ok((Notebook::from_script(&patched), report))
        }
    }
}

fn absolute(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

fn working_dir(notebook: &Path) -> PathBuf {
    let notebook = absolute(notebook);
    match notebook.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

#[cfg(test)]
#[path = "runner_tests.rs"]
mod tests;
