//! # Completions Command Implementation
//!
//! Generates shell completion scripts with `clap_complete` so that the
//! subcommands, the symbol modes and the file arguments of `json-compose`
//! complete on tab.
//!
//! ```bash
//! json-compose completions bash > ~/.local/share/bash-completion/completions/json-compose
//! json-compose completions zsh > ~/.zfunc/_json-compose
//! ```

use anyhow::Result;
use clap::{Args, CommandFactory, ValueEnum};
use clap_complete::{generate, Shell};
use std::io;

use crate::cli::Cli;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum CompletionShell {
    Bash,
    Zsh,
    Fish,
    #[value(name = "powershell")]
    PowerShell,
    Elvish,
}

impl From<CompletionShell> for Shell {
    fn from(shell: CompletionShell) -> Self {
        match shell {
            CompletionShell::Bash => Shell::Bash,
            CompletionShell::Zsh => Shell::Zsh,
            CompletionShell::Fish => Shell::Fish,
            CompletionShell::PowerShell => Shell::PowerShell,
            CompletionShell::Elvish => Shell::Elvish,
        }
    }
}

/// Generate shell completion scripts
#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// The shell to generate completions for
    #[arg(value_enum)]
    pub shell: CompletionShell,
}

/// Write the completion script for the chosen shell to stdout.
pub fn execute(args: CompletionsArgs) -> Result<()> {
    let shell: Shell = args.shell.into();
    generate(shell, &mut Cli::command(), "json-compose", &mut io::stdout());
    Ok(())
}
