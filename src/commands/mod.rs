//! # CLI Command Implementations
//!
//! This module contains the implementation for each subcommand of the
//! `json-compose` command-line tool. Each subcommand is defined in its own
//! file.
//!
//! ## Structure
//!
//! Each command module contains:
//! - An `Args` struct that defines the command-specific arguments and options,
//!   derived using `clap`.
//! - An `execute` function that takes the parsed `Args` and performs the
//!   command's logic by calling into the `json_compose` library.

pub mod completions;
pub mod factor;
pub mod merge;
pub mod merge_all;

use clap::Args;

use json_compose::config::{MergeOptions, SymbolMode};

/// Symbol interpolation options shared by `merge` and `merge-all`.
#[derive(Args, Debug, Clone)]
pub struct SymbolArgs {
    /// How symbol definitions are chosen for interpolation
    #[arg(
        short = 'm',
        long = "mode4symbols",
        value_enum,
        ignore_case = true,
        default_value_t = SymbolMode::Fname
    )]
    pub mode: SymbolMode,

    /// Symbol set to use; required with NAMED mode, rejected otherwise
    #[arg(short = 's', long = "symset", value_name = "NAME")]
    pub symset: Option<String>,
}

impl SymbolArgs {
    pub fn into_options(self) -> anyhow::Result<MergeOptions> {
        Ok(MergeOptions::new(self.mode, self.symset)?)
    }
}
