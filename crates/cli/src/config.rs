// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Layered configuration
//!
//! Precedence, lowest first: built-in defaults, `config.toml`, `NBR_*`
//! environment variables, command-line flags.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_NOTEBOOK: &str = "reliability_test.ipynb";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Interpreter used to drive nbclient
    pub python: String,
    /// Arguments placed before the driver script
    pub python_args: Vec<String>,
    /// Jupyter kernel name
    pub kernel: String,
    /// Notebook used when `--notebook` is not given
    pub notebook: PathBuf,
    /// Environment variable exposing the base directory to the notebook
    pub base_env: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            python: "python3".to_string(),
            python_args: Vec::new(),
            kernel: "python3".to_string(),
            notebook: PathBuf::from(DEFAULT_NOTEBOOK),
            base_env: nbr_core::BASE_DIR_ENV.to_string(),
        }
    }
}

impl Config {
    /// `<config dir>/nbr/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("nbr").join("config.toml"))
    }

    /// Load defaults, then the file, then the process environment
    ///
    /// An explicit path must exist. The default path is skipped when absent.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let config = match explicit {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_path() {
                Some(path) if path.is_file() => Self::from_file(&path)?,
                _ => Self::default(),
            },
        };
        Ok(config.with_env(|key| std::env::var(key).ok()))
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::from_toml(&text).with_context(|| format!("invalid config {}", path.display()))
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Overlay `NBR_*` variables; empty values are ignored
    pub fn with_env(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        if let Some(python) = get("NBR_PYTHON") {
            self.python = python;
        }
        if let Some(args) = get("NBR_PYTHON_ARGS") {
            self.python_args = args.split_whitespace().map(String::from).collect();
        }
        if let Some(kernel) = get("NBR_KERNEL") {
            self.kernel = kernel;
        }
        if let Some(notebook) = get("NBR_NOTEBOOK") {
            self.notebook = PathBuf::from(notebook);
        }
        if let Some(base_env) = get("NBR_BASE_ENV") {
            self.base_env = base_env;
        }
        self
    }

    /// Apply command-line overrides
    pub fn with_overrides(mut self, python: Option<String>, kernel: Option<String>) -> Self {
        if let Some(python) = python {
            self.python = python;
        }
        if let Some(kernel) = kernel {
            self.kernel = kernel;
        }
        self
    }

    pub fn notebook_or(&self, flag: Option<&Path>) -> PathBuf {
        flag.map_or_else(|| self.notebook.clone(), Path::to_path_buf)
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
