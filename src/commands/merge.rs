//! # Merge Command Implementation
//!
//! This module implements the `merge` subcommand: one merge list is resolved,
//! its fragments are deep-merged, symbols are substituted according to the
//! symbol mode, and the result is written as a pretty-printed JSON document.
//!
//! In `DIR` mode the global-symbol document is written to the output path and
//! one more document per named symbol set is written to a subdirectory named
//! after the set.
//!
//! ## Example
//!
//! ```bash
//! # Writes out.merged.de.mergelist.json next to the merge list
//! json-compose merge config/de.mergelist.json
//!
//! # Use the "ifrs" symbol set
//! json-compose merge config/de.mergelist.json -m NAMED -s ifrs -o de.json
//! ```

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use json_compose::cache::DocumentCache;
use json_compose::compose::Composer;
use json_compose::defaults::default_merge_outfile;
use json_compose::output::{OutputConfig, Status};

use super::SymbolArgs;

/// Merge the fragments of one merge list
#[derive(Args, Debug)]
pub struct MergeArgs {
    /// The merge list to compose
    #[arg(value_name = "INFILE")]
    pub infile: PathBuf,

    /// Output file [default: out.merged.<INFILE name> next to INFILE]
    #[arg(short, long, value_name = "PATH")]
    pub outfile: Option<PathBuf>,

    #[command(flatten)]
    pub symbols: SymbolArgs,
}

/// Execute the `merge` command.
pub fn execute(args: MergeArgs, color_flag: &str) -> Result<()> {
    let out = OutputConfig::from_env_and_flag(color_flag);
    if !args.infile.is_file() {
        anyhow::bail!("Merge list not found: {}", args.infile.display());
    }
    let outfile = args
        .outfile
        .unwrap_or_else(|| default_merge_outfile(&args.infile));
    if let Some(parent) = outfile.parent() {
        if !parent.as_os_str().is_empty() && !parent.is_dir() {
            anyhow::bail!(
                "Directory for the output file does not exist: {}",
                parent.display()
            );
        }
    }
    let options = args.symbols.into_options()?;

    let cache = DocumentCache::new();
    let written = Composer::new(&cache).merge_file(&args.infile, &outfile, &options)?;
    for path in &written {
        println!("{} Wrote {}", out.marker(Status::Ok), path.display());
    }
    Ok(())
}
