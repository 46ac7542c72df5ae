//! On-disk document I/O and directory traversal
//!
//! All reading and writing of JSON documents goes through this module so that
//! the output format is the same everywhere: UTF-8, four-space indentation,
//! and a trailing newline.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::ser::PrettyFormatter;

use crate::document::Document;
use crate::error::{Error, Result};
use crate::path::canonical;

/// Read and parse a JSON document.
///
/// A path that does not exist or is not a regular file yields
/// [`Error::NotFound`]; content that is not JSON yields
/// [`Error::MalformedDocument`].
pub fn read_document(path: &Path) -> Result<Document> {
    if !path.is_file() {
        return Err(Error::NotFound {
            path: path.to_path_buf(),
        });
    }
    let content = fs::read_to_string(path).map_err(|err| match err.kind() {
        io::ErrorKind::NotFound => Error::NotFound {
            path: path.to_path_buf(),
        },
        _ => Error::MalformedDocument {
            path: path.to_path_buf(),
            message: err.to_string(),
        },
    })?;
    serde_json::from_str(&content).map_err(|err| Error::MalformedDocument {
        path: path.to_path_buf(),
        message: err.to_string(),
    })
}

/// Serialize a document in the output format.
pub fn to_pretty_string(document: &Document) -> Result<String> {
    let mut buffer = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    document
        .serialize(&mut serializer)
        .map_err(|err| Error::Serialization {
            message: err.to_string(),
        })?;
    let mut text = String::from_utf8(buffer).map_err(|err| Error::Serialization {
        message: err.to_string(),
    })?;
    text.push('\n');
    Ok(text)
}

/// Write a document, creating missing parent directories.
///
/// If the write fails part way, the partially written file is removed.
pub fn write_document(path: &Path, document: &Document) -> Result<()> {
    let text = to_pretty_string(document)?;
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    if let Err(err) = fs::write(path, text) {
        let _ = fs::remove_file(path);
        return Err(Error::Filesystem {
            message: format!("Failed to write {}: {}", path.display(), err),
        });
    }
    Ok(())
}

/// Remove files written earlier in a failed operation. Missing files are
/// ignored; other failures are logged.
pub fn remove_files(paths: &[PathBuf]) {
    for path in paths {
        if let Err(err) = fs::remove_file(path) {
            if err.kind() != io::ErrorKind::NotFound {
                log::warn!("Could not remove {}: {}", path.display(), err);
            }
        }
    }
}

/// Ensure `dir` exists and is empty.
pub fn create_or_empty_dir(dir: &Path) -> Result<()> {
    if dir.exists() {
        if !dir.is_dir() {
            return Err(Error::Filesystem {
                message: format!("{} exists and is not a directory", dir.display()),
            });
        }
        log::debug!("Emptying output directory {}", dir.display());
        fs::remove_dir_all(dir)?;
    }
    fs::create_dir_all(dir)?;
    Ok(())
}

/// List the regular files directly inside `dir`, sorted by file name.
///
/// Symlinks to files are listed; dangling symlinks are not.
pub fn list_files_sorted(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if entry.path().is_file() {
            files.push(entry.path());
        }
    }
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

/// List `root` and every directory below it, parents before children and
/// siblings sorted by name.
///
/// The subtree rooted at `skip` is not descended into, so an output directory
/// nested inside the input tree is never read back as input.
pub fn directories_top_down(root: &Path, skip: Option<&Path>) -> Result<Vec<PathBuf>> {
    let skip = skip.map(canonical);
    let mut dirs = Vec::new();
    for entry in walkdir::WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| {
            if !e.file_type().is_dir() {
                return false;
            }
            match &skip {
                Some(skip) if e.depth() > 0 => canonical(e.path()) != *skip,
                _ => true,
            }
        })
    {
        let entry = entry.map_err(|err| Error::Filesystem {
            message: format!("Failed to walk {}: {}", root.display(), err),
        })?;
        dirs.push(entry.into_path());
    }
    Ok(dirs)
}

/// Expand a glob pattern to the regular files it matches, sorted.
pub fn expand_glob(pattern: &str) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in glob::glob(pattern)? {
        let path = entry.map_err(|err| Error::Filesystem {
            message: format!("Failed to expand {}: {}", pattern, err),
        })?;
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}
