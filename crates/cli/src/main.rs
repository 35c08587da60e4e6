// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! nbr - notebook reliability runner CLI

mod commands;
mod completions;
mod config;
mod error;
mod logging;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{evaluate, patch, run, zip};
use config::Config;
use error::CliError;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(
    name = "nbr",
    version,
    about = "Notebook reliability runner - patch, execute and package evaluation notebooks"
)]
struct Cli {
    /// Config file (default: <config dir>/nbr/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Python interpreter that drives nbclient
    #[arg(long, global = true)]
    python: Option<String>,

    /// Jupyter kernel name
    #[arg(long, global = true)]
    kernel: Option<String>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Write logs to this file instead of stderr
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Stage uploads, run the notebook and package its reports
    Evaluate(evaluate::EvaluateArgs),
    /// Patch and execute a notebook against an existing base directory
    Run(run::RunArgs),
    /// Write a patched copy of a notebook
    Patch(patch::PatchArgs),
    /// Zip a directory
    Zip(zip::ZipArgs),
    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let _log_guard = match logging::setup_logging(cli.verbose, cli.log_file.as_deref()) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("error: {:#}", e);
            return ExitCode::FAILURE;
        }
    };

    match dispatch(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!(error = ?e, "command failed");
            match e.downcast_ref::<CliError>() {
                Some(cli_error) => eprint!("{}", cli_error),
                None => eprintln!("error: {:#}", e),
            }
            ExitCode::FAILURE
        }
    }
}

async fn dispatch(cli: Cli) -> Result<()> {
    if let Commands::Completions(args) = &cli.command {
        completions::generate_completions::<Cli>(args.shell);
        return Ok(());
    }

    let config = Config::load(cli.config.as_deref())?.with_overrides(cli.python, cli.kernel);
    tracing::debug!(?config, "configuration resolved");

    match cli.command {
        Commands::Evaluate(args) => evaluate::evaluate(args, &config).await,
        Commands::Run(args) => run::run(args, &config).await,
        Commands::Patch(args) => patch::patch(args, &config),
        Commands::Zip(args) => zip::zip(args),
        Commands::Completions(_) => Ok(()),
    }
}
