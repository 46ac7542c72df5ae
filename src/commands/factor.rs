//! # Factor Command Implementation
//!
//! This module implements the `factor` subcommand, which extracts the values
//! shared by a family of JSON documents into one common document. Each input
//! is replaced by a residual document holding only what differs, plus a
//! two-entry merge list that rebuilds the input from the common document and
//! its residual.
//!
//! ## Example
//!
//! ```bash
//! # Inputs named by a merge list; outputs are written beside it
//! json-compose factor countries.json
//!
//! # All merged outputs of a merge-all run, mirrored into factored/
//! json-compose factor 'out.config/**/*.merged.json' -o factored
//! ```

use anyhow::Result;
use clap::Args;
use std::path::{Path, PathBuf};

use json_compose::factor::{factor, FactorInput};
use json_compose::output::{OutputConfig, Status};

/// Factor common values out of a family of documents
#[derive(Args, Debug)]
pub struct FactorArgs {
    /// Merge list naming the documents, or a glob pattern matching them
    #[arg(value_name = "INFILE|GLOB")]
    pub input: String,

    /// Output directory, emptied first; required for a glob pattern
    #[arg(short, long, value_name = "DIR")]
    pub outdir: Option<PathBuf>,
}

/// Execute the `factor` command.
pub fn execute(args: FactorArgs, color_flag: &str) -> Result<()> {
    let out = OutputConfig::from_env_and_flag(color_flag);
    let input = if Path::new(&args.input).is_file() {
        FactorInput::MergeList(PathBuf::from(&args.input))
    } else {
        if args.outdir.is_none() {
            anyhow::bail!(
                "{} is not a file; --outdir is required to factor a glob pattern",
                args.input
            );
        }
        FactorInput::Glob(args.input.clone())
    };

    let layout = factor(&input, args.outdir.as_deref())?;
    println!(
        "{} Factored {} documents; common values in {}",
        out.marker(Status::Ok),
        layout.factored.len(),
        layout.common.display()
    );
    Ok(())
}
