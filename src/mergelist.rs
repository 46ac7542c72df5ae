//! Merge-list resolution
//!
//! A merge list is a JSON array of file paths. Relative entries are resolved
//! against the directory containing the list. An entry whose target is itself
//! an array of paths to existing files is a nested merge list and is expanded
//! in place, depth first, so the result is a flat ordered sequence of leaf
//! files.
//!
//! Nested lists are tracked on an explicit stack of canonical paths. Meeting
//! a list that is already on the stack is a cycle.

use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::cache::DocumentCache;
use crate::document::{type_name, Document};
use crate::error::{Error, Result};
use crate::path::{canonical, resolve_entry};

/// Resolves merge lists to the ordered leaf files they reference.
pub struct MergeListResolver<'a> {
    cache: &'a DocumentCache,
}

impl<'a> MergeListResolver<'a> {
    pub fn new(cache: &'a DocumentCache) -> Self {
        Self { cache }
    }

    /// Resolve the merge list at `path` to canonical leaf file paths in
    /// merge order.
    pub fn resolve(&self, path: &Path) -> Result<Vec<PathBuf>> {
        let mut stack = Vec::new();
        let mut leaves = Vec::new();
        self.expand(&canonical(path), &mut stack, &mut leaves)?;
        Ok(leaves)
    }

    fn expand(&self, list: &Path, stack: &mut Vec<PathBuf>, leaves: &mut Vec<PathBuf>) -> Result<()> {
        if stack.iter().any(|p| p == list) {
            let mut cycle: Vec<String> = stack.iter().map(|p| p.display().to_string()).collect();
            cycle.push(list.display().to_string());
            return Err(Error::CycleDetected {
                cycle: cycle.join(" -> "),
            });
        }
        stack.push(list.to_path_buf());

        let document = self.cache.read(list)?;
        let entries = path_entries(&document, list)?;
        let base_dir = list.parent().unwrap_or_else(|| Path::new("/"));

        for entry in entries {
            let resolved = resolve_entry(base_dir, entry);
            if !resolved.is_file() {
                return Err(Error::InvalidReference {
                    mergelist: list.to_path_buf(),
                    entry: entry.to_string(),
                    resolved,
                });
            }
            if self.is_nested_list(&resolved)? {
                log::debug!("Expand nested merge list {}", resolved.display());
                self.expand(&resolved, stack, leaves)?;
            } else {
                leaves.push(resolved);
            }
        }

        stack.pop();
        Ok(())
    }

    /// True if `path` holds an array whose entries are all strings naming
    /// existing files. An empty array qualifies.
    fn is_nested_list(&self, path: &Path) -> Result<bool> {
        let document = self.cache.read(path)?;
        let Some(items) = document.as_array() else {
            return Ok(false);
        };
        let base_dir = path.parent().unwrap_or_else(|| Path::new("/"));
        Ok(items.iter().all(|item| match item {
            Value::String(entry) => resolve_entry(base_dir, entry).is_file(),
            _ => false,
        }))
    }
}

/// Returns the entries of a merge-list document, which must be an array of
/// strings.
fn path_entries<'d>(document: &'d Document, path: &Path) -> Result<Vec<&'d str>> {
    let items = document.as_array().ok_or_else(|| Error::MalformedDocument {
        path: path.to_path_buf(),
        message: format!(
            "a merge list must be an array of file paths, found {}",
            type_name(document)
        ),
    })?;
    items
        .iter()
        .map(|item| {
            item.as_str().ok_or_else(|| Error::MalformedDocument {
                path: path.to_path_buf(),
                message: format!(
                    "merge list entries must be strings, found {}",
                    type_name(item)
                ),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path
    }

    fn names(paths: &[PathBuf], root: &Path) -> Vec<String> {
        let root = canonical(root);
        paths
            .iter()
            .map(|p| p.strip_prefix(&root).unwrap().to_string_lossy().replace('\\', "/"))
            .collect()
    }

    #[test]
    fn test_resolve_relative_and_absolute_entries() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        write(root, "a.json", "{}");
        let b = write(root, "x/b.json", "{}");
        let list = write(
            root,
            "x/y/l.mergelist.json",
            &format!(r#"["../../a.json", "{}"]"#, b.display().to_string().replace('\\', "\\\\")),
        );

        let cache = DocumentCache::new();
        let leaves = MergeListResolver::new(&cache).resolve(&list).unwrap();
        assert_eq!(names(&leaves, root), vec!["a.json", "x/b.json"]);
    }

    #[test]
    fn test_resolve_expands_nested_lists_in_place() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        write(root, "a.json", "{}");
        write(root, "b.json", "{}");
        write(root, "c.json", "{}");
        write(root, "inner.json", r#"["b.json", "c.json"]"#);
        let list = write(root, "l.mergelist.json", r#"["a.json", "inner.json", "a.json"]"#);

        let cache = DocumentCache::new();
        let leaves = MergeListResolver::new(&cache).resolve(&list).unwrap();
        assert_eq!(
            names(&leaves, root),
            vec!["a.json", "b.json", "c.json", "a.json"]
        );
    }

    #[test]
    fn test_array_of_non_files_is_a_leaf() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        write(root, "values.json", r#"["not", "files"]"#);
        let list = write(root, "l.mergelist.json", r#"["values.json"]"#);

        let cache = DocumentCache::new();
        let leaves = MergeListResolver::new(&cache).resolve(&list).unwrap();
        assert_eq!(names(&leaves, root), vec!["values.json"]);
    }

    #[test]
    fn test_empty_nested_list_expands_to_nothing() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        write(root, "a.json", "{}");
        write(root, "empty.json", "[]");
        let list = write(root, "l.mergelist.json", r#"["empty.json", "a.json"]"#);

        let cache = DocumentCache::new();
        let leaves = MergeListResolver::new(&cache).resolve(&list).unwrap();
        assert_eq!(names(&leaves, root), vec!["a.json"]);
    }

    #[test]
    fn test_missing_entry_is_invalid_reference() {
        let temp = TempDir::new().unwrap();
        let list = write(temp.path(), "l.mergelist.json", r#"["missing.json"]"#);

        let cache = DocumentCache::new();
        let err = MergeListResolver::new(&cache).resolve(&list).unwrap_err();
        match err {
            Error::InvalidReference { entry, .. } => assert_eq!(entry, "missing.json"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_self_reference_is_cycle() {
        let temp = TempDir::new().unwrap();
        let list = write(temp.path(), "l.mergelist.json", r#"["l.mergelist.json"]"#);

        let cache = DocumentCache::new();
        let err = MergeListResolver::new(&cache).resolve(&list).unwrap_err();
        assert!(matches!(err, Error::CycleDetected { .. }));
    }

    #[test]
    fn test_transitive_reference_is_cycle() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        write(root, "a.json", "{}");
        write(root, "one.json", r#"["a.json", "two.json"]"#);
        write(root, "two.json", r#"["one.json"]"#);
        let list = write(root, "l.mergelist.json", r#"["one.json"]"#);

        let cache = DocumentCache::new();
        let err = MergeListResolver::new(&cache).resolve(&list).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("one.json -> "));
        assert!(message.contains("two.json"));
    }

    #[test]
    fn test_same_list_twice_is_not_a_cycle() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        write(root, "a.json", "{}");
        write(root, "inner.json", r#"["a.json"]"#);
        let list = write(root, "l.mergelist.json", r#"["inner.json", "inner.json"]"#);

        let cache = DocumentCache::new();
        let leaves = MergeListResolver::new(&cache).resolve(&list).unwrap();
        assert_eq!(names(&leaves, root), vec!["a.json", "a.json"]);
    }

    #[test]
    fn test_merge_list_must_be_array_of_strings() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        let object_list = write(root, "o.mergelist.json", r#"{"a": 1}"#);
        let number_list = write(root, "n.mergelist.json", r#"["a.json", 3]"#);

        let cache = DocumentCache::new();
        let resolver = MergeListResolver::new(&cache);
        assert!(matches!(
            resolver.resolve(&object_list).unwrap_err(),
            Error::MalformedDocument { .. }
        ));
        assert!(matches!(
            resolver.resolve(&number_list).unwrap_err(),
            Error::MalformedDocument { .. }
        ));
    }
}
