// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Notebook run orchestration: load, patch, execute, verify

mod error;
mod runner;

pub use error::RunError;
pub use runner::{load_patched, RunRequest, Runner, RunnerConfig};
