// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced executor wrapper for consistent observability

use crate::executor::{ExecutionContext, ExecutionOutput, ExecutorError, NotebookExecutor};
use async_trait::async_trait;
use nbr_core::Notebook;
use tracing::Instrument;

/// Wrapper that adds tracing to any NotebookExecutor
#[derive(Clone)]
pub struct TracedExecutor<E> {
    inner: E,
}

impl<E> TracedExecutor<E> {
    pub fn new(inner: E) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &E {
        &self.inner
    }
}

#[async_trait]
impl<E: NotebookExecutor> NotebookExecutor for TracedExecutor<E> {
    async fn check(&self) -> Result<(), ExecutorError> {
        let span = tracing::info_span!("executor.check");
        let result = self.inner.check().instrument(span.clone()).await;
        span.in_scope(|| match &result {
            Ok(()) => tracing::debug!("dependencies present"),
            Err(e) => tracing::error!(error = %e, "dependency check failed"),
        });
        result
    }

    async fn execute(
        &self,
        notebook: &Notebook,
        context: &ExecutionContext,
    ) -> Result<ExecutionOutput, ExecutorError> {
        let span = tracing::info_span!(
            "executor.execute",
            working_dir = %context.working_dir.display(),
            base_dir = %context.base_dir.display(),
        );

        // Precondition: working directory must exist
        if !context.working_dir.is_dir() {
            span.in_scope(|| tracing::error!("working directory does not exist"));
            return Err(ExecutorError::SpawnFailed(format!(
                "working directory does not exist: {}",
                context.working_dir.display()
            )));
        }

        span.in_scope(|| {
            tracing::info!(
                cells = notebook.cells.len(),
                code_cells = notebook.code_cells().count(),
                env_count = context.env.len(),
                "starting"
            )
        });

        let start = std::time::Instant::now();
        let result = self
            .inner
            .execute(notebook, context)
            .instrument(span.clone())
            .await;
        let elapsed_ms = start.elapsed().as_millis() as u64;

        span.in_scope(|| match &result {
            Ok(output) => tracing::info!(
                elapsed_ms,
                log_lines = output.lines().count(),
                "notebook executed"
            ),
            Err(e) => tracing::error!(elapsed_ms, error = %e, "execution failed"),
        });

        result
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;
