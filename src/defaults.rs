//! Default values and file-name conventions for json-compose.
//!
//! This module provides the file-name suffixes and reserved names that drive
//! the whole tool, plus the default output locations used by the commands,
//! so they are defined in one place.

use std::path::{Path, PathBuf};

/// Extension of every document the tool reads or writes.
pub const JSON_EXT: &str = ".json";

/// Suffix of merge-list files. The bare name `mergelist.json` also counts.
pub const MERGELIST_EXT: &str = ".mergelist.json";

/// Suffix of symbol definition files. The bare name `symbols.json` also counts.
pub const SYMBOLS_EXT: &str = ".symbols.json";

/// Suffix of generated merge outputs.
pub const MERGED_EXT: &str = ".merged.json";

/// Suffix of per-document residuals written next to their merge list.
pub const FACTORED_EXT: &str = ".factored.json";

/// Prefix of generated files and directories placed beside their inputs.
pub const OUT_PREFIX: &str = "out.";

/// File holding the values shared by every factored document.
pub const COMMON_FACTORS_FILENAME: &str = "common.json";

/// Per-directory file overriding the symbol options for a subtree.
pub const OVERRIDE_FILENAME: &str = "mergeall.args.json";

/// Per-directory file listing merge lists to skip in that directory.
pub const EXCLUDE_FILENAME: &str = "mergeall.exclude.json";

/// Key of the symbol mode in an override file.
pub const MODE_KEY: &str = "--mode4symbols";

/// Returns the default output file for merging `infile`.
///
/// The output sits next to the merge list: `<dir>/out.merged.<name>`.
pub fn default_merge_outfile(infile: &Path) -> PathBuf {
    let name = infile
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let dir = infile.parent().unwrap_or_else(|| Path::new(""));
    dir.join(format!("{}merged.{}", OUT_PREFIX, name))
}

/// Returns the default output directory for walking `indir`.
///
/// The output is a sibling of the input directory: `<parent>/out.<name>`.
pub fn default_merge_all_outdir(indir: &Path) -> PathBuf {
    let canonical = crate::path::canonical(indir);
    let name = canonical
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let parent = canonical.parent().unwrap_or_else(|| Path::new("/"));
    parent.join(format!("{}{}", OUT_PREFIX, name))
}
