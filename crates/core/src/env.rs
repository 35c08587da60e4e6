// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scoped process environment variables

use std::ffi::{OsStr, OsString};

/// Sets an environment variable for as long as the guard lives
///
/// On drop the previous value is restored, or the variable is removed if it
/// was unset. Restoration also happens when the guarded work fails or unwinds.
#[derive(Debug)]
pub struct ScopedEnv {
    key: String,
    previous: Option<OsString>,
}

impl ScopedEnv {
    pub fn set(key: impl Into<String>, value: impl AsRef<OsStr>) -> Self {
        let key = key.into();
        let previous = std::env::var_os(&key);
        tracing::debug!(key, had_previous = previous.is_some(), "setting scoped env var");
        std::env::set_var(&key, value);
        Self { key, previous }
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

impl Drop for ScopedEnv {
    fn drop(&mut self) {
        match self.previous.take() {
            Some(value) => std::env::set_var(&self.key, value),
            None => std::env::remove_var(&self.key),
        }
        tracing::debug!(key = %self.key, "restored scoped env var");
    }
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
