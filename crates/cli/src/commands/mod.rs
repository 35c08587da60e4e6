// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Subcommand implementations

pub mod evaluate;
pub mod options;
pub mod patch;
pub mod run;
pub mod zip;

use crate::config::Config;
use nbr_adapters::{NbClientExecutor, TracedExecutor};
use nbr_engine::{Runner, RunnerConfig};

/// The production runner for the resolved configuration
pub fn runner(config: &Config) -> Runner<TracedExecutor<NbClientExecutor>> {
    let executor = NbClientExecutor::new(&config.python)
        .with_args(config.python_args.clone())
        .with_kernel(&config.kernel);
    Runner::with_config(
        TracedExecutor::new(executor),
        RunnerConfig {
            env_var: config.base_env.clone(),
        },
    )
}
