//! Path manipulation utilities for json-compose
//!
//! Paths are compared by their canonical form: absolute, lexically
//! normalised (`.` and `..` folded without touching the filesystem), and
//! lower-cased on Windows. Symbolic links are not resolved, so two spellings
//! of the same location through different links are different paths.

use std::path::{Component, Path, PathBuf, MAIN_SEPARATOR};

use crate::defaults::{MERGED_EXT, MERGELIST_EXT, SYMBOLS_EXT};
use crate::error::{Error, Result};

/// Returns the canonical form of `path`.
///
/// Relative paths are resolved against the current working directory.
pub fn canonical<P: AsRef<Path>>(path: P) -> PathBuf {
    let path = path.as_ref();
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        match std::env::current_dir() {
            Ok(cwd) => cwd.join(path),
            Err(_) => path.to_path_buf(),
        }
    };
    normcase(normalize(&absolute))
}

/// Returns the canonical form of a directory with a trailing separator.
///
/// Used as a key so that prefix tests on the string form only match whole
/// path components (`/a/b/` is not a prefix of `/a/bc/`).
pub fn dir_key<P: AsRef<Path>>(dir: P) -> String {
    let mut key = canonical(dir).to_string_lossy().into_owned();
    if !key.ends_with(MAIN_SEPARATOR) {
        key.push(MAIN_SEPARATOR);
    }
    key
}

/// Resolves a merge-list entry against the directory containing the list.
pub fn resolve_entry(base_dir: &Path, entry: &str) -> PathBuf {
    let entry_path = Path::new(entry);
    if entry_path.is_absolute() {
        canonical(entry_path)
    } else {
        canonical(base_dir.join(entry_path))
    }
}

/// Returns `target` relative to `base_dir`, with `/` separators.
///
/// Both paths are canonicalised first. Returns `.` when they are the same.
pub fn relative_path(target: &Path, base_dir: &Path) -> String {
    let target = canonical(target);
    let base = canonical(base_dir);
    let target_parts: Vec<Component> = target.components().collect();
    let base_parts: Vec<Component> = base.components().collect();

    let shared = target_parts
        .iter()
        .zip(base_parts.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut parts: Vec<String> = Vec::new();
    for _ in shared..base_parts.len() {
        parts.push("..".to_string());
    }
    for part in &target_parts[shared..] {
        parts.push(part.as_os_str().to_string_lossy().into_owned());
    }

    if parts.is_empty() {
        ".".to_string()
    } else {
        parts.join("/")
    }
}

/// Returns the longest directory shared by all `files`.
///
/// For a single file this is its parent directory.
pub fn common_dir(files: &[PathBuf]) -> Option<PathBuf> {
    let (first, rest) = files.split_first()?;
    let first = canonical(first);
    let mut common = first.parent()?.to_path_buf();
    for file in rest {
        let file = canonical(file);
        while !file.starts_with(&common) {
            if !common.pop() {
                return None;
            }
        }
        // A file equal to the common prefix means the prefix is a file path.
        if file == common {
            common.pop();
        }
    }
    Some(common)
}

/// Maps source files below one root onto the same relative location below
/// another root.
#[derive(Debug, Clone)]
pub struct Mirror {
    source_root: PathBuf,
    target_root: PathBuf,
}

impl Mirror {
    /// Mirror everything below `source_root` into `target_root`.
    pub fn new<P: AsRef<Path>, Q: AsRef<Path>>(source_root: P, target_root: Q) -> Self {
        Self {
            source_root: canonical(source_root),
            target_root: canonical(target_root),
        }
    }

    /// Mirror `files` starting below their longest common directory.
    pub fn for_files<Q: AsRef<Path>>(files: &[PathBuf], target_root: Q) -> Result<Self> {
        let root = common_dir(files).ok_or_else(|| Error::Path {
            message: format!("No common directory for files to mirror: {:?}", files),
        })?;
        Ok(Self::new(root, target_root))
    }

    /// The target root directory.
    pub fn target_root(&self) -> &Path {
        &self.target_root
    }

    /// Returns `source` relative to the source root.
    pub fn relative(&self, source: &Path) -> Result<PathBuf> {
        let source = canonical(source);
        source
            .strip_prefix(&self.source_root)
            .map(Path::to_path_buf)
            .map_err(|_| Error::Path {
                message: format!(
                    "To mirror subdirectories, path must start with '{}'. Path: '{}'",
                    self.source_root.display(),
                    source.display()
                ),
            })
    }

    /// Returns the mirrored location of `source` below the target root.
    pub fn target_path(&self, source: &Path) -> Result<PathBuf> {
        Ok(self.target_root.join(self.relative(source)?))
    }
}

/// ASCII case-insensitive suffix test.
pub fn ends_with_ignore_case(name: &str, suffix: &str) -> bool {
    name.len() >= suffix.len()
        && name.is_char_boundary(name.len() - suffix.len())
        && name[name.len() - suffix.len()..].eq_ignore_ascii_case(suffix)
}

/// True if the file name of `path` ends with `suffix`, or is the suffix
/// without its leading dot (e.g. `mergelist.json` for `.mergelist.json`).
fn is_named_like(path: &Path, suffix: &str) -> bool {
    let Some(name) = path.file_name().map(|n| n.to_string_lossy()) else {
        return false;
    };
    ends_with_ignore_case(&name, suffix) || name.eq_ignore_ascii_case(&suffix[1..])
}

/// True if `path` names a merge list.
pub fn is_mergelist<P: AsRef<Path>>(path: P) -> bool {
    is_named_like(path.as_ref(), MERGELIST_EXT)
}

/// True if `path` names a symbol definition file.
pub fn is_symbol_file<P: AsRef<Path>>(path: P) -> bool {
    is_named_like(path.as_ref(), SYMBOLS_EXT)
}

/// Returns the output file name for a merge-list file name.
///
/// `x.mergelist.json` becomes `x.merged.json`; the bare `mergelist.json`
/// becomes `merged.json`.
pub fn merged_file_name(mergelist_name: &str) -> Result<String> {
    if mergelist_name.eq_ignore_ascii_case(&MERGELIST_EXT[1..]) {
        return Ok(MERGED_EXT[1..].to_string());
    }
    if !ends_with_ignore_case(mergelist_name, MERGELIST_EXT) {
        return Err(Error::Path {
            message: format!("Invalid merge list file name \"{}\"", mergelist_name),
        });
    }
    let stem = &mergelist_name[..mergelist_name.len() - MERGELIST_EXT.len()];
    Ok(format!("{}{}", stem, MERGED_EXT))
}

fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => out.push(component.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            Component::Normal(part) => out.push(part),
        }
    }
    out
}

fn normcase(path: PathBuf) -> PathBuf {
    if cfg!(windows) {
        PathBuf::from(path.to_string_lossy().to_lowercase())
    } else {
        path
    }
}
