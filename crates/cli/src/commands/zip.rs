// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `nbr zip <SRC> <OUT>` - Package a directory as a deflate zip

use crate::output::{print_list, OutputFormat};
use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;

#[derive(Args)]
pub struct ZipArgs {
    /// Directory to package
    pub src: PathBuf,

    /// Archive to write
    pub out: PathBuf,

    /// Format for the archived file listing
    #[arg(long, value_enum, default_value_t)]
    pub format: OutputFormat,
}

pub fn zip(args: ZipArgs) -> Result<()> {
    let out = nbr_core::zip_dir(&args.src, &args.out)
        .with_context(|| format!("failed to package {}", args.src.display()))?;
    let files = nbr_core::list_archived(&args.src, &out)?;
    print_list(&files, args.format)?;
    eprintln!("wrote {} ({} files)", out.display(), files.len());
    Ok(())
}
