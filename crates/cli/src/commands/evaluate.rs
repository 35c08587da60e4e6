// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `nbr evaluate` - Stage uploads, run the notebook, package the reports
//!
//! Uploads are copied into a fresh temporary base directory laid out as
//! `aihub/raw/{videos,labels}`. After a successful run the reports directory
//! is zipped, `report.md` is rendered verbatim and the archive is copied to
//! `--out`. The temporary directory is removed when the command ends.

use super::options::{LimitArgs, NotebookArg};
use crate::config::Config;
use crate::error::CliError;
use crate::output::{self, OutputFormat};
use anyhow::{Context, Result};
use clap::Args;
use nbr_core::{DatasetLayout, StageSummary};
use nbr_engine::RunRequest;
use serde::Serialize;
use std::collections::VecDeque;
use std::fmt;
use std::path::{Path, PathBuf};

/// Log lines kept in view
pub const LOG_TAIL_LINES: usize = 250;

const ARCHIVE_NAME: &str = "reports.zip";

#[derive(Args)]
pub struct EvaluateArgs {
    /// Video files to evaluate (repeatable)
    #[arg(long = "video", value_name = "FILE", required = true, num_args = 1..)]
    pub videos: Vec<PathBuf>,

    /// Label files matching the videos (repeatable)
    #[arg(long = "label", value_name = "FILE", required = true, num_args = 1..)]
    pub labels: Vec<PathBuf>,

    #[command(flatten)]
    pub notebook: NotebookArg,

    #[command(flatten)]
    pub limits: LimitArgs,

    /// Where to copy the reports archive
    #[arg(long, default_value = ARCHIVE_NAME)]
    pub out: PathBuf,

    #[arg(long, value_enum, default_value_t)]
    pub format: OutputFormat,
}

/// Bounded buffer of the most recent log lines
#[derive(Debug, Clone)]
pub struct LogTail {
    lines: VecDeque<String>,
    capacity: usize,
    dropped: usize,
}

impl LogTail {
    pub fn new(capacity: usize) -> Self {
        Self {
            lines: VecDeque::with_capacity(capacity.min(1024)),
            capacity,
            dropped: 0,
        }
    }

    pub fn push(&mut self, line: &str) {
        if self.capacity == 0 {
            self.dropped += 1;
            return;
        }
        if self.lines.len() == self.capacity {
            self.lines.pop_front();
            self.dropped += 1;
        }
        self.lines.push_back(line.to_string());
    }

    /// Lines pushed out of view so far
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// The `== log ==` section as printed in the summary
    pub fn render(&self) -> String {
        let mut out = log_heading(self.lines.len(), self.dropped);
        for line in &self.lines {
            out.push_str(line);
            out.push('\n');
        }
        out
    }

    pub fn into_lines(self) -> Vec<String> {
        self.lines.into()
    }
}

fn log_heading(shown: usize, dropped: usize) -> String {
    if dropped > 0 {
        format!("== log (last {} lines) ==\n", shown)
    } else {
        "== log ==\n".to_string()
    }
}

#[derive(Debug, Serialize)]
pub struct EvaluateSummary {
    pub videos: usize,
    pub labels: usize,
    pub log_dropped: usize,
    pub log: Vec<String>,
    pub report: Option<String>,
    pub archive: PathBuf,
    pub files: Vec<String>,
}

impl fmt::Display for EvaluateSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "staged {} video(s) and {} label file(s)",
            self.videos, self.labels
        )?;

        writeln!(f)?;
        write!(f, "{}", log_heading(self.log.len(), self.log_dropped))?;
        for line in &self.log {
            writeln!(f, "{}", line)?;
        }

        writeln!(f)?;
        writeln!(f, "== report.md ==")?;
        match &self.report {
            Some(report) => {
                write!(f, "{}", report)?;
                if !report.ends_with('\n') {
                    writeln!(f)?;
                }
            }
            None => writeln!(f, "(no report.md generated)")?,
        }

        writeln!(f)?;
        writeln!(f, "== files ==")?;
        for file in &self.files {
            writeln!(f, "{}", file)?;
        }

        writeln!(f)?;
        writeln!(f, "archive: {}", self.archive.display())
    }
}

pub async fn evaluate(args: EvaluateArgs, config: &Config) -> Result<()> {
    let notebook = config.notebook_or(args.notebook.notebook.as_deref());
    let workdir = tempfile::Builder::new()
        .prefix("nbr-")
        .tempdir()
        .context("failed to create temporary directory")?;
    let base = workdir.path().join("base");

    let layout = DatasetLayout::new(&base);
    let staged = layout
        .stage(&args.videos, &args.labels)
        .context("failed to stage uploads")?;

    let mut tail = LogTail::new(LOG_TAIL_LINES);
    let request = RunRequest::new(notebook, args.limits.values(&base));
    let result = {
        let mut collect = |line: &str| tail.push(line);
        super::runner(config)
            .run(&request, Some(&mut collect))
            .await
    };
    let reports = match result {
        Ok(reports) => reports,
        Err(err) => {
            // The notebook's own output is the best clue to why it failed
            if !tail.is_empty() {
                eprintln!("{}", tail.render());
            }
            return Err(CliError::from(err).into());
        }
    };

    let summary = package(&layout, &reports, workdir.path(), &args.out, staged, tail)?;
    output::print(&summary, args.format)?;
    Ok(())
}

/// Zip the reports, copy the archive to `out` and gather what to display
fn package(
    layout: &DatasetLayout,
    reports: &Path,
    scratch: &Path,
    out: &Path,
    staged: StageSummary,
    tail: LogTail,
) -> Result<EvaluateSummary> {
    let archive = nbr_core::zip_dir(reports, &scratch.join(ARCHIVE_NAME))
        .context("failed to package reports")?;

    let report_md = layout.report_md();
    let report = if report_md.is_file() {
        let bytes = std::fs::read(&report_md)
            .with_context(|| format!("failed to read {}", report_md.display()))?;
        Some(String::from_utf8_lossy(&bytes).into_owned())
    } else {
        None
    };

    if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    std::fs::copy(&archive, out).with_context(|| format!("failed to write {}", out.display()))?;

    let log_dropped = tail.dropped();
    Ok(EvaluateSummary {
        videos: staged.videos,
        labels: staged.labels,
        log_dropped,
        log: tail.into_lines(),
        report,
        archive: out.to_path_buf(),
        files: nbr_core::list_files(reports)?,
    })
}

#[cfg(test)]
#[path = "evaluate_tests.rs"]
mod tests;
