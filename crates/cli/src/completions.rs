// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shell completion generation for the nbr CLI.
//!
//! ```bash
//! nbr completions bash > ~/.local/share/bash-completion/completions/nbr
//! nbr completions zsh > ~/.zfunc/_nbr
//! nbr completions fish > ~/.config/fish/completions/nbr.fish
//! ```

use clap::CommandFactory;
use clap_complete::{generate, Shell};
use std::io::Write;

const BIN_NAME: &str = "nbr";

/// Arguments for the completions command.
#[derive(clap::Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

pub fn write_completions<C: CommandFactory>(shell: Shell, out: &mut dyn Write) {
    let mut cmd = C::command();
    generate(shell, &mut cmd, BIN_NAME, out);
}

pub fn generate_completions<C: CommandFactory>(shell: Shell) {
    write_completions::<C>(shell, &mut std::io::stdout().lock());
}
