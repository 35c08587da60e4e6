// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake notebook executor for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{ExecutionContext, ExecutionOutput, ExecutorError, NotebookExecutor};
use async_trait::async_trait;
use nbr_core::Notebook;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

/// Something the fake does when asked to execute, in order
#[derive(Debug, Clone)]
pub enum FakeAction {
    /// Append a line to the captured log
    Print(String),
    /// Write a file relative to the base directory, creating parents
    WriteFile { path: PathBuf, contents: String },
    /// Create a directory relative to the base directory
    CreateDir(PathBuf),
    /// Stop with an execution failure carrying the log so far
    Fail(String),
}

/// Recorded executor call
#[derive(Debug, Clone)]
pub enum ExecutorCall {
    Check,
    Execute {
        notebook: Notebook,
        context: ExecutionContext,
        /// Process environment seen during execution for each context env key
        observed_env: Vec<(String, Option<String>)>,
    },
}

/// Fake executor that replays scripted actions against the base directory
#[derive(Clone, Default)]
pub struct FakeExecutor {
    actions: Arc<Mutex<Vec<FakeAction>>>,
    missing_dependency: Arc<Mutex<Option<String>>>,
    calls: Arc<Mutex<Vec<ExecutorCall>>>,
}

impl FakeExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn then(self, action: FakeAction) -> Self {
        self.actions
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(action);
        self
    }

    pub fn prints(self, line: impl Into<String>) -> Self {
        self.then(FakeAction::Print(line.into()))
    }

    pub fn writes(self, path: impl Into<PathBuf>, contents: impl Into<String>) -> Self {
        self.then(FakeAction::WriteFile {
            path: path.into(),
            contents: contents.into(),
        })
    }

    pub fn creates_dir(self, path: impl Into<PathBuf>) -> Self {
        self.then(FakeAction::CreateDir(path.into()))
    }

    pub fn fails(self, message: impl Into<String>) -> Self {
        self.then(FakeAction::Fail(message.into()))
    }

    /// Make `check` report a missing dependency
    pub fn missing_dependency(self, detail: impl Into<String>) -> Self {
        *self
            .missing_dependency
            .lock()
            .unwrap_or_else(|e| e.into_inner()) = Some(detail.into());
        self
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<ExecutorCall> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Notebooks passed to `execute`, in call order
    pub fn executed(&self) -> Vec<Notebook> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                ExecutorCall::Execute { notebook, .. } => Some(notebook),
                ExecutorCall::Check => None,
            })
            .collect()
    }

    fn record(&self, call: ExecutorCall) {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(call);
    }
}

#[async_trait]
impl NotebookExecutor for FakeExecutor {
    async fn check(&self) -> Result<(), ExecutorError> {
        self.record(ExecutorCall::Check);
        let missing = self
            .missing_dependency
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone();
        match missing {
            Some(detail) => Err(ExecutorError::missing_dependency(detail)),
            None => Ok(()),
        }
    }

    async fn execute(
        &self,
        notebook: &Notebook,
        context: &ExecutionContext,
    ) -> Result<ExecutionOutput, ExecutorError> {
        let observed_env = context
            .env
            .iter()
            .map(|(k, _)| (k.clone(), std::env::var(k).ok()))
            .collect();
        self.record(ExecutorCall::Execute {
            notebook: notebook.clone(),
            context: context.clone(),
            observed_env,
        });

        let actions = self
            .actions
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone();

        let mut log = String::new();
        for action in actions {
            match action {
                FakeAction::Print(line) => {
                    log.push_str(&line);
                    log.push('\n');
                }
                FakeAction::WriteFile { path, contents } => {
                    let path = context.base_dir.join(path);
                    if let Some(parent) = path.parent() {
                        std::fs::create_dir_all(parent)?;
                    }
                    std::fs::write(&path, contents)?;
                }
                FakeAction::CreateDir(path) => {
                    std::fs::create_dir_all(context.base_dir.join(path))?;
                }
                FakeAction::Fail(message) => {
                    log.push_str(&message);
                    log.push('\n');
                    return Err(ExecutorError::Failed {
                        status: Some(1),
                        output: log,
                    });
                }
            }
        }

        Ok(ExecutionOutput { log })
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
