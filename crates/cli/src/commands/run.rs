// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `nbr run` - Patch and execute a notebook against an existing base directory

use super::options::{LimitArgs, NotebookArg};
use crate::config::Config;
use crate::error::CliError;
use anyhow::Result;
use clap::Args;
use nbr_engine::RunRequest;
use std::path::PathBuf;

#[derive(Args)]
pub struct RunArgs {
    #[command(flatten)]
    pub notebook: NotebookArg,

    /// Base directory containing aihub/raw/{videos,labels}
    #[arg(long)]
    pub base_dir: PathBuf,

    #[command(flatten)]
    pub limits: LimitArgs,
}

pub async fn run(args: RunArgs, config: &Config) -> Result<()> {
    let notebook = config.notebook_or(args.notebook.notebook.as_deref());
    let request = RunRequest::new(notebook, args.limits.values(&args.base_dir));

    let mut echo = |line: &str| println!("{}", line);
    let reports = super::runner(config)
        .run(&request, Some(&mut echo))
        .await
        .map_err(CliError::from)?;

    println!("reports: {}", reports.display());
    Ok(())
}
