// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! nbr-core: notebook documents, constant patching, dataset layout and packaging
//!
//! This crate provides:
//! - An nbformat v4 document model that round-trips unknown fields
//! - The patcher for the four notebook constants
//! - The on-disk dataset layout and upload staging
//! - A scoped process environment guard
//! - Zip packaging of the reports directory

pub mod env;
pub mod layout;
pub mod notebook;
pub mod package;
pub mod patch;

pub use env::ScopedEnv;
pub use layout::{DatasetLayout, StageError, StageSummary, BASE_DIR_ENV};
pub use notebook::{Cell, Notebook, NotebookError, NotebookFormat};
pub use package::{list_archived, list_files, zip_dir, PackageError};
pub use patch::{patch_notebook, patch_source, PatchReport, PatchTarget, PatchValues, Variable};
