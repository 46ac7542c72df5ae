//! CLI argument parsing and command dispatch

use anyhow::Result;
use clap::{Parser, Subcommand};
use env_logger::Env;

use crate::commands;

/// JSON Compose - Build JSON documents from merge lists of fragments
#[derive(Parser, Debug)]
#[command(name = "json-compose")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Colorize output (always, never, auto)
    #[arg(long, global = true, value_name = "WHEN", default_value = "auto")]
    color: String,

    /// Set log level (error, warn, info, debug, trace); RUST_LOG takes precedence
    #[arg(long, global = true, value_name = "LEVEL", default_value = "info")]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Merge the fragments of one merge list into a single document
    Merge(commands::merge::MergeArgs),

    /// Merge every merge list below a directory into a mirrored output tree
    MergeAll(commands::merge_all::MergeAllArgs),

    /// Factor the values shared by a family of documents into a common file
    Factor(commands::factor::FactorArgs),

    /// Generate shell completion scripts
    Completions(commands::completions::CompletionsArgs),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        init_logging(&self.log_level);

        match self.command {
            Commands::Merge(args) => commands::merge::execute(args, &self.color),
            Commands::MergeAll(args) => commands::merge_all::execute(args, &self.color),
            Commands::Factor(args) => commands::factor::execute(args, &self.color),
            Commands::Completions(args) => commands::completions::execute(args),
        }
    }
}

fn init_logging(level: &str) {
    env_logger::Builder::from_env(Env::default().default_filter_or(level))
        .format_timestamp(None)
        .format_target(false)
        .init();
}
