// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Notebook documents
//!
//! Two on-disk forms are understood:
//! - `.ipynb` files in nbformat v4 JSON
//! - percent-format scripts, where `# %%` lines start a new cell and
//!   `# %% [markdown]` starts a markdown cell
//!
//! Fields this crate does not interpret (metadata, outputs, cell ids) are kept
//! verbatim so a load/save cycle does not lose anything the kernel needs.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors from loading or serialising notebooks
#[derive(Debug, Error)]
pub enum NotebookError {
    #[error("failed to read notebook {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid notebook JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// How a notebook file is laid out on disk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotebookFormat {
    /// nbformat v4 JSON
    Ipynb,
    /// Percent-format script (`# %%` cell markers)
    Script,
}

impl NotebookFormat {
    /// Pick the format from the file extension; anything but `.ipynb` is a script
    pub fn from_path(path: &Path) -> Self {
        let is_ipynb = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("ipynb"));
        if is_ipynb {
            NotebookFormat::Ipynb
        } else {
            NotebookFormat::Script
        }
    }
}

/// A single notebook cell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    pub cell_type: String,
    #[serde(
        default,
        deserialize_with = "deserialize_multiline",
        serialize_with = "serialize_multiline"
    )]
    pub source: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Cell {
    /// A fresh code cell with no outputs
    pub fn code(source: impl Into<String>) -> Self {
        let mut extra = Map::new();
        extra.insert("metadata".to_string(), Value::Object(Map::new()));
        extra.insert("outputs".to_string(), Value::Array(Vec::new()));
        extra.insert("execution_count".to_string(), Value::Null);
        Self {
            cell_type: "code".to_string(),
            source: source.into(),
            extra,
        }
    }

    /// A fresh markdown cell
    pub fn markdown(source: impl Into<String>) -> Self {
        let mut extra = Map::new();
        extra.insert("metadata".to_string(), Value::Object(Map::new()));
        Self {
            cell_type: "markdown".to_string(),
            source: source.into(),
            extra,
        }
    }

    pub fn is_code(&self) -> bool {
        self.cell_type == "code"
    }
}

/// An ordered collection of cells plus notebook-level metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notebook {
    #[serde(default)]
    pub cells: Vec<Cell>,
    #[serde(default)]
    pub metadata: Map<String, Value>,
    #[serde(default = "default_nbformat")]
    pub nbformat: u32,
    #[serde(default = "default_nbformat_minor")]
    pub nbformat_minor: u32,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn default_nbformat() -> u32 {
    4
}

// Minor 4 does not require per-cell ids, which script-built cells lack
fn default_nbformat_minor() -> u32 {
    4
}

impl Notebook {
    /// Build a notebook from cells with empty metadata
    pub fn from_cells(cells: Vec<Cell>) -> Self {
        Self {
            cells,
            metadata: Map::new(),
            nbformat: default_nbformat(),
            nbformat_minor: default_nbformat_minor(),
            extra: Map::new(),
        }
    }

    /// Read a notebook file, replacing invalid UTF-8
    pub fn load(path: &Path) -> Result<Self, NotebookError> {
        let bytes = std::fs::read(path).map_err(|source| NotebookError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let text = String::from_utf8_lossy(&bytes);
        match NotebookFormat::from_path(path) {
            NotebookFormat::Ipynb => Self::from_json(&text),
            NotebookFormat::Script => Ok(Self::from_script(&text)),
        }
    }

    /// Parse nbformat v4 JSON
    pub fn from_json(text: &str) -> Result<Self, NotebookError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Split a percent-format script into cells
    pub fn from_script(text: &str) -> Self {
        let mut cells = Vec::new();
        let mut markdown = false;
        let mut current = String::new();

        for line in text.split_inclusive('\n') {
            if let Some(marker) = line.trim_end().strip_prefix("# %%") {
                push_script_cell(&mut cells, &current, markdown);
                current.clear();
                markdown = marker.contains("[markdown]");
                continue;
            }
            current.push_str(line);
        }
        push_script_cell(&mut cells, &current, markdown);

        Self::from_cells(cells)
    }

    /// Serialise as pretty nbformat v4 JSON with a trailing newline
    pub fn to_json(&self) -> Result<String, NotebookError> {
        let mut out = serde_json::to_string_pretty(self)?;
        out.push('\n');
        Ok(out)
    }

    pub fn code_cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter().filter(|c| c.is_code())
    }

    pub fn code_cells_mut(&mut self) -> impl Iterator<Item = &mut Cell> {
        self.cells.iter_mut().filter(|c| c.is_code())
    }
}

fn push_script_cell(cells: &mut Vec<Cell>, body: &str, markdown: bool) {
    if body.trim().is_empty() {
        return;
    }
    let body = body.trim_end_matches(['\n', '\r']);
    if markdown {
        let text: Vec<&str> = body
            .lines()
            .map(|l| l.strip_prefix("# ").or_else(|| l.strip_prefix('#')).unwrap_or(l))
            .collect();
        cells.push(Cell::markdown(text.join("\n")));
    } else {
        cells.push(Cell::code(body));
    }
}

/// nbformat stores multiline strings either whole or as a list of lines
#[derive(Deserialize)]
#[serde(untagged)]
enum MultilineString {
    Whole(String),
    Lines(Vec<String>),
}

fn deserialize_multiline<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match MultilineString::deserialize(deserializer)? {
        MultilineString::Whole(s) => s,
        MultilineString::Lines(lines) => lines.concat(),
    })
}

fn serialize_multiline<S: Serializer>(source: &str, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(source.split_inclusive('\n'))
}

#[cfg(test)]
#[path = "notebook_tests.rs"]
mod tests;
