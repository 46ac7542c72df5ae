//! # Merge-All Command Implementation
//!
//! This module implements the `merge-all` subcommand, which composes every
//! merge list below an input directory into a mirrored output tree.
//!
//! Directories may carry `mergeall.args.json` to change the symbol options
//! for their subtree and `mergeall.exclude.json` to skip merge lists in that
//! directory. A merge list that fails does not stop the walk; the failures
//! are listed at the end and the command exits with status 1.

use anyhow::Result;
use clap::Args;
use console::style;
use std::path::PathBuf;

use json_compose::defaults::default_merge_all_outdir;
use json_compose::merge_all::{merge_all, MergeAllReport};
use json_compose::output::{OutputConfig, Status};

use super::SymbolArgs;

/// Merge every merge list below a directory
#[derive(Args, Debug)]
pub struct MergeAllArgs {
    /// Directory tree to search for merge lists
    #[arg(value_name = "INDIR")]
    pub indir: PathBuf,

    /// Output directory, emptied first [default: out.<INDIR name> beside INDIR]
    #[arg(short, long, value_name = "DIR")]
    pub outdir: Option<PathBuf>,

    #[command(flatten)]
    pub symbols: SymbolArgs,
}

/// Execute the `merge-all` command.
pub fn execute(args: MergeAllArgs, color_flag: &str) -> Result<()> {
    let out = OutputConfig::from_env_and_flag(color_flag);
    if !args.indir.is_dir() {
        anyhow::bail!("Input directory not found: {}", args.indir.display());
    }
    let outdir = args
        .outdir
        .unwrap_or_else(|| default_merge_all_outdir(&args.indir));
    let options = args.symbols.into_options()?;

    let report = merge_all(&args.indir, &outdir, options)?;
    print_summary(&out, &report);

    if !report.is_success() {
        anyhow::bail!(
            "{} of {} merge lists failed",
            report.failures.len(),
            report.mergelists
        );
    }
    Ok(())
}

fn print_summary(out: &OutputConfig, report: &MergeAllReport) {
    let status = if !report.is_success() {
        Status::Err
    } else if report.mergelists == 0 {
        Status::Warn
    } else {
        Status::Ok
    };
    println!(
        "{} Wrote {} files from {} merge lists",
        out.marker(status),
        report.written.len(),
        report.mergelists
    );
    if report.is_success() {
        return;
    }

    let banner = format!("{} MERGE LISTS FAILED", report.failures.len());
    let rule = "*".repeat(banner.len() + 4);
    if out.use_color {
        println!("{}", style(&rule).red().bold().force_styling(true));
        println!("{}", style(format!("* {} *", banner)).red().bold().force_styling(true));
        println!("{}", style(&rule).red().bold().force_styling(true));
    } else {
        println!("{}\n* {} *\n{}", rule, banner, rule);
    }
    for failure in &report.failures {
        println!(
            "{} {}: {}",
            out.marker(Status::Err),
            failure.mergelist.display(),
            failure.error
        );
    }
}
