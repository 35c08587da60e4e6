// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Dataset directory layout shared with the notebook
//!
//! ```text
//! <base>/aihub/raw/videos/*.mp4   staged uploads
//! <base>/aihub/raw/labels/*.json  staged uploads
//! <base>/reports/                 written by the notebook
//! <base>/reports/report.md        optional summary
//! ```

use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

/// Environment variable exposing the base directory during execution
pub const BASE_DIR_ENV: &str = "BASE_DIR";

/// Name of the directory the notebook writes its results to
pub const REPORTS_DIR: &str = "reports";

/// Optional summary inside the reports directory
pub const REPORT_MD: &str = "report.md";

/// Errors from staging uploads
#[derive(Debug, Error)]
pub enum StageError {
    #[error("upload has no file name: {0}")]
    NoFileName(PathBuf),
    #[error("failed to stage {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Counts of files staged per directory
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StageSummary {
    pub videos: usize,
    pub labels: usize,
}

/// Paths under one base directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetLayout {
    base: PathBuf,
}

impl DatasetLayout {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    pub fn videos_dir(&self) -> PathBuf {
        self.base.join("aihub").join("raw").join("videos")
    }

    pub fn labels_dir(&self) -> PathBuf {
        self.base.join("aihub").join("raw").join("labels")
    }

    pub fn reports_dir(&self) -> PathBuf {
        self.base.join(REPORTS_DIR)
    }

    pub fn report_md(&self) -> PathBuf {
        self.reports_dir().join(REPORT_MD)
    }

    /// Create the video and label directories
    pub fn create(&self) -> Result<(), StageError> {
        for dir in [self.videos_dir(), self.labels_dir()] {
            std::fs::create_dir_all(&dir).map_err(|source| StageError::Io { path: dir, source })?;
        }
        Ok(())
    }

    /// Copy uploads into place by file name
    ///
    /// Only the final path component is kept, so an upload can never land
    /// outside its directory. A later upload with the same name replaces an
    /// earlier one. Video and label names are not cross-checked.
    pub fn stage<V, L>(&self, videos: &[V], labels: &[L]) -> Result<StageSummary, StageError>
    where
        V: AsRef<Path>,
        L: AsRef<Path>,
    {
        self.create()?;
        let summary = StageSummary {
            videos: stage_into(&self.videos_dir(), videos)?,
            labels: stage_into(&self.labels_dir(), labels)?,
        };
        tracing::info!(
            base = %self.base.display(),
            videos = summary.videos,
            labels = summary.labels,
            "staged uploads"
        );
        Ok(summary)
    }

    /// Every directory named `reports` anywhere under the base, for diagnosing
    /// notebooks that wrote their results somewhere unexpected
    pub fn reports_candidates(&self) -> Vec<PathBuf> {
        WalkDir::new(&self.base)
            .min_depth(1)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_dir() && e.file_name() == REPORTS_DIR)
            .map(|e| e.into_path())
            .collect()
    }
}

fn stage_into<P: AsRef<Path>>(dir: &Path, uploads: &[P]) -> Result<usize, StageError> {
    for upload in uploads {
        let upload = upload.as_ref();
        let name = upload
            .file_name()
            .ok_or_else(|| StageError::NoFileName(upload.to_path_buf()))?;
        let dest = dir.join(name);
        tracing::debug!(from = %upload.display(), to = %dest.display(), "staging upload");
        std::fs::copy(upload, &dest).map_err(|source| StageError::Io {
            path: upload.to_path_buf(),
            source,
        })?;
    }
    Ok(uploads.len())
}

#[cfg(test)]
#[path = "layout_tests.rs"]
mod tests;
