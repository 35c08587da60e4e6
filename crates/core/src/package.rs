// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Zip packaging of result directories

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::{DirEntry, WalkDir};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Errors from packaging
#[derive(Debug, Error)]
pub enum PackageError {
    #[error("source directory not found: {0}")]
    SourceNotFound(PathBuf),
    #[error("failed to walk {path}: {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),
}

fn io_error(path: &Path) -> impl FnOnce(io::Error) -> PackageError + '_ {
    move |source| PackageError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Zip every regular file under `src` into `out`, returning `out`
///
/// Entry names are relative to `src` with `/` separators. Entries appear in
/// traversal order. When `out` lies inside `src` the archive skips itself.
pub fn zip_dir(src: &Path, out: &Path) -> Result<PathBuf, PackageError> {
    if !src.is_dir() {
        return Err(PackageError::SourceNotFound(src.to_path_buf()));
    }

    let file = File::create(out).map_err(io_error(out))?;
    let own_archive = out.canonicalize().ok();
    let mut zip = ZipWriter::new(BufWriter::new(file));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    let mut count = 0usize;
    for entry in files_under(src) {
        let entry = entry?;
        let path = entry.path();
        if is_archive(path, own_archive.as_deref()) {
            continue;
        }
        let Some(name) = archive_name(src, path) else {
            continue;
        };

        zip.start_file(name, options)?;
        let mut input = File::open(path).map_err(io_error(path))?;
        io::copy(&mut input, &mut zip).map_err(io_error(path))?;
        count += 1;
    }

    let mut writer = zip.finish()?;
    writer.flush().map_err(io_error(out))?;

    tracing::info!(src = %src.display(), out = %out.display(), files = count, "packaged directory");
    Ok(out.to_path_buf())
}

/// Sorted `/`-separated paths of every regular file under `src`
pub fn list_files(src: &Path) -> Result<Vec<String>, PackageError> {
    list_except(src, None)
}

/// Sorted entry names of the archive `zip_dir(src, out)` writes
///
/// Call after `zip_dir`; `out` is left out when it lies inside `src`.
pub fn list_archived(src: &Path, out: &Path) -> Result<Vec<String>, PackageError> {
    list_except(src, out.canonicalize().ok().as_deref())
}

fn list_except(src: &Path, own_archive: Option<&Path>) -> Result<Vec<String>, PackageError> {
    if !src.is_dir() {
        return Err(PackageError::SourceNotFound(src.to_path_buf()));
    }
    let mut names = Vec::new();
    for entry in files_under(src) {
        let entry = entry?;
        if is_archive(entry.path(), own_archive) {
            continue;
        }
        if let Some(name) = archive_name(src, entry.path()) {
            names.push(name);
        }
    }
    names.sort();
    Ok(names)
}

fn is_archive(path: &Path, own_archive: Option<&Path>) -> bool {
    match own_archive {
        Some(own) => path.canonicalize().is_ok_and(|p| p == own),
        None => false,
    }
}

fn files_under(src: &Path) -> impl Iterator<Item = Result<DirEntry, PackageError>> + '_ {
    WalkDir::new(src)
        .follow_links(true)
        .into_iter()
        .filter_map(move |entry| match entry {
            Ok(e) if e.file_type().is_file() => Some(Ok(e)),
            Ok(_) => None,
            Err(source) => Some(Err(PackageError::Walk {
                path: src.to_path_buf(),
                source,
            })),
        })
}

fn archive_name(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let parts: Vec<_> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join("/"))
    }
}

#[cfg(test)]
#[path = "package_tests.rs"]
mod tests;
