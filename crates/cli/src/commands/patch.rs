// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `nbr patch` - Write a patched copy of a notebook without running it

use super::options::{LimitArgs, NotebookArg};
use crate::config::Config;
use crate::error::CliError;
use anyhow::{bail, Context, Result};
use clap::Args;
use nbr_core::{patch_source, NotebookFormat, PatchReport};
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Args)]
pub struct PatchArgs {
    #[command(flatten)]
    pub notebook: NotebookArg,

    /// Base directory written into BASE
    #[arg(long)]
    pub base_dir: PathBuf,

    #[command(flatten)]
    pub limits: LimitArgs,

    /// Where to write the patched notebook (default: stdout)
    #[arg(long, short)]
    pub output: Option<PathBuf>,
}

pub fn patch(args: PatchArgs, config: &Config) -> Result<()> {
    let notebook = config.notebook_or(args.notebook.notebook.as_deref());
    if !notebook.is_file() {
        return Err(CliError::notebook_not_found(&notebook).into());
    }
    if let Some(output) = &args.output {
        if same_file(&notebook, output) {
            bail!("refusing to overwrite the input notebook {}", notebook.display());
        }
    }

    let values = args.limits.values(&args.base_dir);
    let (text, report) = match NotebookFormat::from_path(&notebook) {
        NotebookFormat::Ipynb => {
            let (nb, report) = nbr_engine::load_patched(&notebook, &values).map_err(CliError::from)?;
            (nb.to_json()?, report)
        }
        NotebookFormat::Script => {
            let bytes = std::fs::read(&notebook)
                .with_context(|| format!("failed to read {}", notebook.display()))?;
            patch_source(&String::from_utf8_lossy(&bytes), &values)
        }
    };

    match &args.output {
        Some(path) => std::fs::write(path, &text)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => std::io::stdout().write_all(text.as_bytes())?,
    }
    eprint!("{}", summary(&report));
    Ok(())
}

fn summary(report: &PatchReport) -> String {
    let names = |vars: Vec<nbr_core::Variable>| {
        vars.iter().map(|v| v.name()).collect::<Vec<_>>().join(", ")
    };
    let mut out = String::new();
    let replaced = report.replaced();
    if !replaced.is_empty() {
        out.push_str(&format!("patched: {}\n", names(replaced)));
    }
    let missing = report.missing();
    if !missing.is_empty() {
        out.push_str(&format!("not found: {}\n", names(missing)));
    }
    out
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

#[cfg(test)]
#[path = "patch_tests.rs"]
mod tests;
