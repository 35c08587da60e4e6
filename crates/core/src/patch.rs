// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Notebook constant patching
//!
//! The notebook declares four constants at the top of a code cell. Before a
//! run their right-hand sides are rewritten to the caller's values:
//!
//! ```text
//! BASE = Path(r"/abs/base")
//! MAX_VIDEOS = None
//! MAX_IMAGES_TOTAL = 500
//! SKIP_EXISTING = True
//! ```
//!
//! An assignment matches when a line starts (after optional spaces or tabs)
//! with the exact name, optional spaces or tabs, then `=` not followed by `=`.
//! Every matching assignment is replaced, so branches such as
//! `if IN_COLAB: BASE = ... else: BASE = ...` all see the caller's value.
//! A variable that never appears is not an error; [`PatchReport`] records it.
//!
//! Assignments must fit on one line. A right-hand side that leaves a bracket
//! open (`BASE = Path(` continued on the next line) is left untouched.

use crate::notebook::Notebook;
use regex::Regex;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

/// The constants the notebook is expected to declare
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variable {
    Base,
    MaxVideos,
    MaxImagesTotal,
    SkipExisting,
}

impl Variable {
    pub const ALL: [Variable; 4] = [
        Variable::Base,
        Variable::MaxVideos,
        Variable::MaxImagesTotal,
        Variable::SkipExisting,
    ];

    /// Name as written in the notebook source
    pub fn name(self) -> &'static str {
        match self {
            Variable::Base => "BASE",
            Variable::MaxVideos => "MAX_VIDEOS",
            Variable::MaxImagesTotal => "MAX_IMAGES_TOTAL",
            Variable::SkipExisting => "SKIP_EXISTING",
        }
    }

    fn pattern(self) -> &'static Regex {
        match self {
            Variable::Base => &BASE_PATTERN,
            Variable::MaxVideos => &MAX_VIDEOS_PATTERN,
            Variable::MaxImagesTotal => &MAX_IMAGES_TOTAL_PATTERN,
            Variable::SkipExisting => &SKIP_EXISTING_PATTERN,
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// Capture 1 is the indentation, capture 2 the right-hand side; the match
// ends at the line break. `=` must be followed by a non-`=` character or the
// end of the line.
fn assignment_pattern(name: &str) -> Regex {
    let pattern = format!(
        r"(?mR)^([ \t]*){}[ \t]*=([^=\r\n][^\r\n]*|$)",
        regex::escape(name)
    );
    #[allow(clippy::expect_used)]
    Regex::new(&pattern).expect("assignment pattern built from a constant name is valid")
}

static BASE_PATTERN: LazyLock<Regex> = LazyLock::new(|| assignment_pattern("BASE"));
static MAX_VIDEOS_PATTERN: LazyLock<Regex> = LazyLock::new(|| assignment_pattern("MAX_VIDEOS"));
static MAX_IMAGES_TOTAL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| assignment_pattern("MAX_IMAGES_TOTAL"));
static SKIP_EXISTING_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| assignment_pattern("SKIP_EXISTING"));

/// Values substituted into the notebook for one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchValues {
    pub base_dir: PathBuf,
    pub max_videos: Option<u64>,
    pub max_images_total: Option<u64>,
    pub skip_existing: bool,
}

impl PatchValues {
    /// Unlimited counts, skipping existing outputs
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            max_videos: None,
            max_images_total: None,
            skip_existing: true,
        }
    }

    pub fn max_videos(mut self, limit: Option<u64>) -> Self {
        self.max_videos = limit;
        self
    }

    pub fn max_images_total(mut self, limit: Option<u64>) -> Self {
        self.max_images_total = limit;
        self
    }

    pub fn skip_existing(mut self, skip: bool) -> Self {
        self.skip_existing = skip;
        self
    }

    /// The four replacements, in declaration order
    pub fn targets(&self) -> [PatchTarget; 4] {
        [
            PatchTarget::new(Variable::Base, path_expression(&self.base_dir)),
            PatchTarget::new(Variable::MaxVideos, int_or_none(self.max_videos)),
            PatchTarget::new(Variable::MaxImagesTotal, int_or_none(self.max_images_total)),
            PatchTarget::new(Variable::SkipExisting, py_bool(self.skip_existing)),
        ]
    }
}

/// A variable and the Python expression that replaces its right-hand side
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchTarget {
    pub variable: Variable,
    pub expression: String,
}

impl PatchTarget {
    pub fn new(variable: Variable, expression: impl Into<String>) -> Self {
        Self {
            variable,
            expression: expression.into(),
        }
    }

    /// Replace every matching single-line assignment, returning the new text
    pub fn apply(&self, text: &str) -> Option<String> {
        let mut out = String::with_capacity(text.len() + self.expression.len());
        let mut last = 0;
        let mut replaced = false;

        for caps in self.variable.pattern().captures_iter(text) {
            let Some(whole) = caps.get(0) else {
                continue;
            };
            let rhs = caps.get(2).map_or("", |m| m.as_str());
            if !closes_brackets(rhs) {
                tracing::debug!(
                    variable = %self.variable,
                    "skipping assignment that continues past its line"
                );
                continue;
            }
            let indent = caps.get(1).map_or("", |m| m.as_str());

            out.push_str(&text[last..whole.start()]);
            out.push_str(indent);
            out.push_str(self.variable.name());
            out.push_str(" = ");
            out.push_str(&self.expression);
            last = whole.end();
            replaced = true;
        }

        if !replaced {
            return None;
        }
        out.push_str(&text[last..]);
        Some(out)
    }

    /// In-place variant of [`PatchTarget::apply`]; returns whether anything changed
    pub fn apply_in_place(&self, text: &mut String) -> bool {
        match self.apply(text) {
            Some(patched) => {
                *text = patched;
                true
            }
            None => false,
        }
    }
}

/// Which variables were found and replaced
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PatchReport {
    replaced: [bool; 4],
}

impl PatchReport {
    pub fn mark(&mut self, variable: Variable) {
        self.replaced[variable.index()] = true;
    }

    pub fn was_replaced(&self, variable: Variable) -> bool {
        self.replaced[variable.index()]
    }

    pub fn replaced(&self) -> Vec<Variable> {
        Variable::ALL
            .into_iter()
            .filter(|v| self.was_replaced(*v))
            .collect()
    }

    pub fn missing(&self) -> Vec<Variable> {
        Variable::ALL
            .into_iter()
            .filter(|v| !self.was_replaced(*v))
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.replaced.iter().all(|r| *r)
    }
}

/// Patch flat source text (scripts)
pub fn patch_source(text: &str, values: &PatchValues) -> (String, PatchReport) {
    let mut patched = text.to_string();
    let mut report = PatchReport::default();
    for target in values.targets() {
        if target.apply_in_place(&mut patched) {
            report.mark(target.variable);
        }
    }
    (patched, report)
}

/// Patch every code cell
pub fn patch_notebook(notebook: &mut Notebook, values: &PatchValues) -> PatchReport {
    let targets = values.targets();
    let mut report = PatchReport::default();
    for cell in notebook.code_cells_mut() {
        for target in &targets {
            if target.apply_in_place(&mut cell.source) {
                report.mark(target.variable);
            }
        }
    }
    report
}

fn int_or_none(value: Option<u64>) -> String {
    value.map_or_else(|| "None".to_string(), |n| n.to_string())
}

fn py_bool(value: bool) -> &'static str {
    if value {
        "True"
    } else {
        "False"
    }
}

// False when `(`, `[` or `{` is left open, ignoring string contents and
// trailing comments.
fn closes_brackets(rhs: &str) -> bool {
    let mut depth = 0i32;
    let mut quote: Option<char> = None;
    let mut escaped = false;
    for c in rhs.chars() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '\'' | '"' => quote = Some(c),
            '#' => break,
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => depth -= 1,
            _ => {}
        }
    }
    depth <= 0
}

/// `Path(r"...")` for the absolute form of `path`, always with `/` separators
pub fn path_expression(path: &Path) -> String {
    let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    let posix = absolute.to_string_lossy().replace('\\', "/");
    if posix.contains(['"', '\n', '\r']) {
        let escaped = posix
            .replace('"', "\\\"")
            .replace('\n', "\\n")
            .replace('\r', "\\r");
        format!("Path(\"{}\")", escaped)
    } else {
        format!("Path(r\"{}\")", posix)
    }
}

#[cfg(test)]
#[path = "patch_tests.rs"]
mod tests;
