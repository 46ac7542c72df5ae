//! Directory-scoped merge options
//!
//! During a directory walk the merge options can change per subtree. A
//! `mergeall.args.json` file in a directory sets the options for that
//! directory and everything below it, until a deeper override file sets them
//! again. Options are looked up by the longest directory key that is a prefix
//! of the directory's canonical path.
//!
//! A `mergeall.exclude.json` file lists merge lists in its own directory
//! that the walk should skip. It does not apply to subdirectories.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use crate::config::{MergeOptions, OverrideFile};
use crate::defaults::EXCLUDE_FILENAME;
use crate::error::{Error, Result};
use crate::filesystem::read_document;
use crate::path::{dir_key, is_mergelist};

/// Effective merge options per directory.
#[derive(Debug, Clone)]
pub struct DirectoryOptions {
    entries: BTreeMap<String, MergeOptions>,
    /// The root key, until the root's own override file has replaced it.
    replaceable_root: Option<String>,
}

impl DirectoryOptions {
    /// Start with `options` applying to `root` and everything below it.
    pub fn new(root: &Path, options: MergeOptions) -> Self {
        let key = dir_key(root);
        let mut entries = BTreeMap::new();
        entries.insert(key.clone(), options);
        Self {
            entries,
            replaceable_root: Some(key),
        }
    }

    /// Set the options for `dir` and its descendants.
    ///
    /// The root entry may be replaced once, by the root directory's override
    /// file. Setting options for any other directory twice is an error.
    pub fn add(&mut self, dir: &Path, options: MergeOptions) -> Result<()> {
        let key = dir_key(dir);
        if self.replaceable_root.as_deref() == Some(key.as_str()) {
            self.replaceable_root = None;
        } else if self.entries.contains_key(&key) {
            return Err(Error::DirectoryOverride {
                path: dir.to_path_buf(),
                message: "options for this directory were already set".to_string(),
            });
        }
        self.entries.insert(key, options);
        Ok(())
    }

    /// Returns the options in effect for `dir`.
    pub fn get(&self, dir: &Path) -> Result<&MergeOptions> {
        let key = dir_key(dir);
        self.entries
            .iter()
            .filter(|(prefix, _)| key.starts_with(prefix.as_str()))
            .max_by_key(|(prefix, _)| prefix.len())
            .map(|(_, options)| options)
            .ok_or_else(|| Error::DirectoryOverride {
                path: dir.to_path_buf(),
                message: "directory is outside the tree being merged".to_string(),
            })
    }

    /// Read an override file and apply it to the directory containing it.
    pub fn apply_override_file(&mut self, path: &Path) -> Result<MergeOptions> {
        let invalid = |message: String| Error::DirectoryOverride {
            path: path.to_path_buf(),
            message,
        };
        let document = read_document(path)?;
        if !document.is_object() {
            return Err(invalid("expected a JSON object".to_string()));
        }
        let file: OverrideFile =
            serde_json::from_value(document).map_err(|err| invalid(err.to_string()))?;
        let options = file.into_options().map_err(|err| invalid(err.to_string()))?;

        let dir = path.parent().unwrap_or_else(|| Path::new(""));
        self.add(dir, options.clone())?;
        log::info!("Options {} apply in and under {}", options, dir.display());
        Ok(options)
    }
}

/// Read the exclusion list at `path` and validate it against the names of
/// the files in its directory.
///
/// Every entry must be a bare file name (no directory part) of a merge list
/// present in the directory.
pub fn read_exclusions(path: &Path, present: &[String]) -> Result<Vec<String>> {
    let invalid = |message: String| Error::DirectoryOverride {
        path: path.to_path_buf(),
        message,
    };
    let document = read_document(path)?;
    let names: Vec<String> = serde_json::from_value(document).map_err(|err| {
        invalid(format!("{} must be an array of file names: {}", EXCLUDE_FILENAME, err))
    })?;

    let mut seen = HashSet::new();
    for name in &names {
        if !seen.insert(name.as_str()) {
            return Err(invalid(format!("\"{}\" is listed more than once", name)));
        }
        if !present.iter().any(|p| p == name) {
            return Err(invalid(format!("no file named \"{}\" in this directory", name)));
        }
        if !is_mergelist(name) {
            return Err(invalid(format!(
                "\"{}\" does not match the merge list naming pattern",
                name
            )));
        }
        if Path::new(name).components().count() != 1 {
            return Err(invalid(format!("\"{}\" must not have path components", name)));
        }
    }
    Ok(names)
}
