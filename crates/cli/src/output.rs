// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Output formatting for CLI commands

use anyhow::Result;
use clap::ValueEnum;
use serde::Serialize;
use std::fmt::Display;
use std::io::Write;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text
    #[default]
    Text,
    /// Pretty-printed JSON
    Json,
}

/// Write a value: its `Display` form as text, or pretty JSON
pub fn write<T, W>(out: &mut W, value: &T, format: OutputFormat) -> Result<()>
where
    T: Serialize + Display,
    W: Write,
{
    match format {
        OutputFormat::Text => write!(out, "{}", value)?,
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, value)?;
            writeln!(out)?;
        }
    }
    Ok(())
}

/// Write a list: one item per line as text, or a JSON array
pub fn write_list<T, W>(out: &mut W, items: &[T], format: OutputFormat) -> Result<()>
where
    T: Serialize + Display,
    W: Write,
{
    match format {
        OutputFormat::Text => {
            for item in items {
                writeln!(out, "{}", item)?;
            }
        }
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, items)?;
            writeln!(out)?;
        }
    }
    Ok(())
}

pub fn print<T: Serialize + Display>(value: &T, format: OutputFormat) -> Result<()> {
    write(&mut std::io::stdout().lock(), value, format)
}

pub fn print_list<T: Serialize + Display>(items: &[T], format: OutputFormat) -> Result<()> {
    write_list(&mut std::io::stdout().lock(), items, format)
}
