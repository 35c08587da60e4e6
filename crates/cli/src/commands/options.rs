// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Arguments shared by commands that patch a notebook

use clap::Args;
use nbr_core::PatchValues;
use std::path::{Path, PathBuf};

#[derive(Args, Debug, Clone, Default)]
pub struct LimitArgs {
    /// Maximum number of videos to process (0 = unlimited)
    #[arg(long, default_value_t = 0)]
    pub max_videos: u64,

    /// Maximum number of images across all videos (0 = unlimited)
    #[arg(long, default_value_t = 0)]
    pub max_images: u64,

    /// Skip outputs that already exist (default)
    #[arg(long, overrides_with = "no_skip_existing")]
    pub skip_existing: bool,

    /// Regenerate outputs even when they already exist
    #[arg(long, overrides_with = "skip_existing")]
    pub no_skip_existing: bool,
}

impl LimitArgs {
    pub fn skips_existing(&self) -> bool {
        !self.no_skip_existing
    }

    pub fn values(&self, base_dir: &Path) -> PatchValues {
        PatchValues::new(base_dir)
            .max_videos(limit(self.max_videos))
            .max_images_total(limit(self.max_images))
            .skip_existing(self.skips_existing())
    }
}

fn limit(n: u64) -> Option<u64> {
    (n > 0).then_some(n)
}

/// `--notebook`, falling back to configuration
#[derive(Args, Debug, Clone, Default)]
pub struct NotebookArg {
    /// Notebook to run (.ipynb or percent-format .py)
    #[arg(long, short)]
    pub notebook: Option<PathBuf>,
}

#[cfg(test)]
#[path = "options_tests.rs"]
mod tests;
