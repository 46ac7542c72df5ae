//! Merging every merge list below a directory
//!
//! The input tree is walked top-down: a directory is processed before any of
//! its subdirectories, and both files and subdirectories are taken in sorted
//! order. Per directory:
//!
//! 1. merge lists named in `mergeall.exclude.json` are dropped,
//! 2. `mergeall.args.json` sets new options for the directory and below,
//! 3. the effective options are looked up,
//! 4. every remaining merge list is composed into the mirrored location
//!    below the output directory.
//!
//! The order matters in DIR mode: a per-set output written while processing
//! a directory can be overwritten by the output of a merge list with the same
//! name in the set's own subdirectory, which is processed later.
//!
//! A merge list that fails is recorded and the walk continues. Problems with
//! the exclusion and override files themselves end the walk.

use std::path::{Path, PathBuf};

use crate::cache::DocumentCache;
use crate::compose::Composer;
use crate::config::MergeOptions;
use crate::defaults::{EXCLUDE_FILENAME, OVERRIDE_FILENAME};
use crate::error::{Error, Result};
use crate::filesystem::{create_or_empty_dir, directories_top_down, list_files_sorted};
use crate::overrides::{read_exclusions, DirectoryOptions};
use crate::path::{canonical, is_mergelist, merged_file_name, Mirror};

/// A merge list that could not be composed.
#[derive(Debug)]
pub struct MergeFailure {
    pub mergelist: PathBuf,
    pub error: Error,
}

/// Outcome of a directory walk.
#[derive(Debug, Default)]
pub struct MergeAllReport {
    /// Every output file written, in order.
    pub written: Vec<PathBuf>,
    /// Merge lists that failed, in walk order.
    pub failures: Vec<MergeFailure>,
    /// Number of merge lists found, excluded ones not counted.
    pub mergelists: usize,
}

impl MergeAllReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Compose every merge list below `indir` into `outdir`.
///
/// `outdir` is emptied first. It may lie inside `indir`, in which case it is
/// not walked.
pub fn merge_all(indir: &Path, outdir: &Path, options: MergeOptions) -> Result<MergeAllReport> {
    options.validate()?;
    if !indir.is_dir() {
        return Err(Error::NotFound {
            path: indir.to_path_buf(),
        });
    }
    let indir = canonical(indir);
    let outdir = canonical(outdir);
    if indir.starts_with(&outdir) {
        return Err(Error::InvalidOptions {
            message: format!(
                "output directory {} would contain the input directory {}",
                outdir.display(),
                indir.display()
            ),
        });
    }

    create_or_empty_dir(&outdir)?;
    log::info!("Merge all merge lists in {} into {}", indir.display(), outdir.display());

    let cache = DocumentCache::new();
    let composer = Composer::new(&cache);
    let mirror = Mirror::new(&indir, &outdir);
    let mut dir_options = DirectoryOptions::new(&indir, options);
    let mut report = MergeAllReport::default();

    for dir in directories_top_down(&indir, Some(&outdir))? {
        let files = list_files_sorted(&dir)?;
        let mut names: Vec<String> = files
            .iter()
            .filter_map(|f| f.file_name().map(|n| n.to_string_lossy().into_owned()))
            .collect();

        if names.iter().any(|n| n == EXCLUDE_FILENAME) {
            let excluded = read_exclusions(&dir.join(EXCLUDE_FILENAME), &names)?;
            for name in &excluded {
                log::info!("Skip {} listed in {} of {}", name, EXCLUDE_FILENAME, dir.display());
            }
            names.retain(|n| !excluded.contains(n));
        }

        if names.iter().any(|n| n == OVERRIDE_FILENAME) {
            dir_options.apply_override_file(&dir.join(OVERRIDE_FILENAME))?;
        }

        let effective = dir_options.get(&dir)?.clone();

        for name in names.iter().filter(|n| is_mergelist(n.as_str())) {
            report.mergelists += 1;
            let mergelist = dir.join(name);
            let target = mirror
                .target_path(&mergelist)?
                .with_file_name(merged_file_name(name)?);

            match composer.merge_file(&mergelist, &target, &effective) {
                Ok(written) => report.written.extend(written),
                Err(error) => {
                    log::error!(
                        "Failed to merge {} with options {}: {}",
                        mergelist.display(),
                        effective,
                        error
                    );
                    report.failures.push(MergeFailure { mergelist, error });
                }
            }
        }
    }

    if report.mergelists == 0 {
        log::warn!("No merge lists found in {}", indir.display());
    }
    Ok(report)
}
