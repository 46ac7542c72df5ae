//! Common-factor extraction
//!
//! Factoring splits a family of similar JSON objects into one document with
//! the values they all share and one residual document per input. For each
//! input a two-entry merge list `[common, residual]` is written as well, so
//! merging it reproduces the input.
//!
//! Documents are compared as flat tables from key path to leaf value. Objects
//! are descended into; arrays, scalars and empty objects are leaves:
//!
//! ```text
//! {"J45": {"COUNTRY": "CN", "CODE": "1310"}, "tags": []}
//!   => J45.COUNTRY = "CN", J45.CODE = "1310", tags = []
//! ```
//!
//! Example: factoring `a.json` `{"x":1,"y":2}` and `b.json` `{"z":3,"y":2}`
//! yields the common document `{"y":2}` and residuals `{"x":1}` and `{"z":3}`.

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::path::{Path, PathBuf};

use serde_json::{Map, Number, Value};

use crate::cache::DocumentCache;
use crate::defaults::{
    COMMON_FACTORS_FILENAME, FACTORED_EXT, JSON_EXT, MERGED_EXT, MERGELIST_EXT, OUT_PREFIX,
};
use crate::document::{require_object, Document, KeyPath, Object};
use crate::error::{Error, Result};
use crate::filesystem::{create_or_empty_dir, expand_glob, write_document};
use crate::mergelist::MergeListResolver;
use crate::path::{canonical, ends_with_ignore_case, relative_path, Mirror};

/// A document flattened to its leaf values.
pub type FlatDocument = BTreeMap<KeyPath, Value>;

/// Flatten an object to a table of key paths to leaf values.
pub fn flatten(object: &Object) -> FlatDocument {
    let mut flat = FlatDocument::new();
    flatten_into(object, &KeyPath::root(), &mut flat);
    flat
}

fn flatten_into(object: &Object, prefix: &KeyPath, flat: &mut FlatDocument) {
    for (key, value) in object {
        let path = prefix.child(key);
        match value {
            Value::Object(child) if !child.is_empty() => flatten_into(child, &path, flat),
            leaf => {
                flat.insert(path, leaf.clone());
            }
        }
    }
}

/// Rebuild a nested document from flat entries.
pub fn inflate<'a, I>(entries: I) -> Document
where
    I: IntoIterator<Item = (&'a KeyPath, &'a Value)>,
{
    let mut root = Map::new();
    for (path, value) in entries {
        insert_at(&mut root, path.segments(), value);
    }
    Value::Object(root)
}

fn insert_at(object: &mut Object, segments: &[String], value: &Value) {
    match segments {
        [] => {}
        [last] => {
            object.insert(last.clone(), value.clone());
        }
        [first, rest @ ..] => {
            let slot = object
                .entry(first.clone())
                .or_insert_with(|| Value::Object(Map::new()));
            if !slot.is_object() {
                *slot = Value::Object(Map::new());
            }
            if let Value::Object(child) = slot {
                insert_at(child, rest, value);
            }
        }
    }
}

/// Key paths holding the same value in every table.
///
/// Starts from the first table and only ever shrinks.
pub fn intersection(tables: &[FlatDocument]) -> BTreeSet<KeyPath> {
    let Some((first, rest)) = tables.split_first() else {
        return BTreeSet::new();
    };
    let mut common: BTreeSet<KeyPath> = first.keys().cloned().collect();
    for table in rest {
        if common.is_empty() {
            break;
        }
        common.retain(|key| match (table.get(key), first.get(key)) {
            (Some(a), Some(b)) => same_value(a, b),
            _ => false,
        });
        log::debug!("{} key paths still in common", common.len());
    }
    common
}

/// JSON equality where numbers compare by value, so `1` equals `1.0`.
fn same_value(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => same_number(x, y),
        (Value::Array(xs), Value::Array(ys)) => {
            xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| same_value(x, y))
        }
        (Value::Object(xs), Value::Object(ys)) => {
            xs.len() == ys.len()
                && xs
                    .iter()
                    .all(|(k, x)| ys.get(k).is_some_and(|y| same_value(x, y)))
        }
        _ => a == b,
    }
}

fn same_number(x: &Number, y: &Number) -> bool {
    if let (Some(x), Some(y)) = (x.as_i64(), y.as_i64()) {
        return x == y;
    }
    if let (Some(x), Some(y)) = (x.as_u64(), y.as_u64()) {
        return x == y;
    }
    x.as_f64() == y.as_f64()
}

/// Result of factoring a family of documents.
#[derive(Debug, Clone, PartialEq)]
pub struct Factored {
    pub common: Document,
    /// One per input, in input order.
    pub residuals: Vec<Document>,
}

/// Factor the common values out of `documents`.
///
/// Every document must be an object. Logs a warning when nothing is common
/// and for every document left with an empty residual.
pub fn factor_documents(documents: &[(PathBuf, Document)]) -> Result<Factored> {
    let mut tables = Vec::with_capacity(documents.len());
    for (origin, document) in documents {
        tables.push(flatten(require_object(document, origin)?));
    }

    let common_keys = intersection(&tables);
    if common_keys.is_empty() {
        log::warn!("The {} documents have no common values", documents.len());
    } else {
        log::info!(
            "In all {} documents {} values are common",
            documents.len(),
            common_keys.len()
        );
    }

    let common = match tables.first() {
        Some(first) => inflate(first.iter().filter(|(k, _)| common_keys.contains(*k))),
        None => Value::Object(Map::new()),
    };

    let mut residuals = Vec::with_capacity(tables.len());
    for ((origin, _), table) in documents.iter().zip(&tables) {
        let residual: Vec<(&KeyPath, &Value)> = table
            .iter()
            .filter(|(k, _)| !common_keys.contains(*k))
            .collect();
        if residual.is_empty() {
            log::warn!("All values factored out of {}", origin.display());
        }
        residuals.push(inflate(residual));
    }

    Ok(Factored { common, residuals })
}

/// The files to factor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FactorInput {
    /// A merge list naming the files.
    MergeList(PathBuf),
    /// A glob pattern matching the files; `**` matches any depth.
    Glob(String),
}

/// Where the outputs of a factoring run were written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FactorLayout {
    pub common: PathBuf,
    /// Residual document per input.
    pub factored: Vec<PathBuf>,
    /// Reconstruction merge list per input.
    pub mergelists: Vec<PathBuf>,
}

/// Factor the files named by `input` and write the results.
///
/// Without `outdir` the outputs are written next to the merge list with an
/// `out.` prefix. With `outdir` the directory is emptied and the inputs'
/// directory structure is mirrored below it.
pub fn factor(input: &FactorInput, outdir: Option<&Path>) -> Result<FactorLayout> {
    let cache = DocumentCache::new();
    let (paths, source_dir) = match input {
        FactorInput::MergeList(list) => {
            let list = canonical(list);
            let paths = MergeListResolver::new(&cache).resolve(&list)?;
            let dir = list.parent().map(Path::to_path_buf);
            (paths, dir)
        }
        FactorInput::Glob(pattern) => {
            if outdir.is_none() {
                return Err(Error::InvalidOptions {
                    message: "an output directory is required when factoring a glob pattern"
                        .to_string(),
                });
            }
            let paths: Vec<PathBuf> = expand_glob(pattern)?.iter().map(canonical).collect();
            (paths, None)
        }
    };

    let paths = dedup(paths);
    if paths.is_empty() {
        return Err(Error::InvalidOptions {
            message: "no files to factor".to_string(),
        });
    }

    let mut documents = Vec::with_capacity(paths.len());
    for path in &paths {
        documents.push((path.clone(), cache.read(path)?));
    }
    let factored = factor_documents(&documents)?;

    let layout = match outdir {
        Some(outdir) => mirrored_layout(&paths, outdir)?,
        None => {
            let dir = source_dir.ok_or_else(|| Error::InvalidOptions {
                message: "an output directory is required".to_string(),
            })?;
            local_layout(&paths, &dir)
        }
    };

    write_document(&layout.common, &factored.common)?;
    for (i, residual) in factored.residuals.iter().enumerate() {
        write_document(&layout.factored[i], residual)?;
        let list_dir = layout.mergelists[i]
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        let reconstruction = Value::Array(vec![
            Value::String(relative_path(&layout.common, &list_dir)),
            Value::String(relative_path(&layout.factored[i], &list_dir)),
        ]);
        write_document(&layout.mergelists[i], &reconstruction)?;
    }
    log::info!(
        "Factored {} files; common values in {}",
        paths.len(),
        layout.common.display()
    );
    Ok(layout)
}

fn dedup(paths: Vec<PathBuf>) -> Vec<PathBuf> {
    let mut seen = HashSet::new();
    let mut unique = Vec::with_capacity(paths.len());
    for path in paths {
        if seen.insert(path.clone()) {
            unique.push(path);
        } else {
            log::warn!("{} listed more than once; factored once", path.display());
        }
    }
    unique
}

/// Outputs beside the merge list: `out.common.json`,
/// `out.<base>.factored.json` and `out.<base>.mergelist.json`.
fn local_layout(paths: &[PathBuf], dir: &Path) -> FactorLayout {
    let common = dir.join(format!("{}{}", OUT_PREFIX, COMMON_FACTORS_FILENAME));
    let mut factored = Vec::with_capacity(paths.len());
    let mut mergelists = Vec::with_capacity(paths.len());
    for path in paths {
        let base = base_name(path, false);
        factored.push(dir.join(format!("{}{}{}", OUT_PREFIX, base, FACTORED_EXT)));
        mergelists.push(dir.join(format!("{}{}{}", OUT_PREFIX, base, MERGELIST_EXT)));
    }
    FactorLayout {
        common,
        factored,
        mergelists,
    }
}

/// Outputs mirrored below `outdir`: `common.json` at the root, and
/// `<base>.json` with `<base>.mergelist.json` per input.
fn mirrored_layout(paths: &[PathBuf], outdir: &Path) -> Result<FactorLayout> {
    let outdir = canonical(outdir);
    if let Some(input) = paths.iter().find(|path| path.starts_with(&outdir)) {
        return Err(Error::InvalidOptions {
            message: format!(
                "output directory {} would contain the input {}",
                outdir.display(),
                input.display()
            ),
        });
    }
    let mirror = Mirror::for_files(paths, &outdir)?;
    create_or_empty_dir(mirror.target_root())?;
    let common = mirror.target_root().join(COMMON_FACTORS_FILENAME);
    let mut factored = Vec::with_capacity(paths.len());
    let mut mergelists = Vec::with_capacity(paths.len());
    for path in paths {
        let target = mirror.target_path(path)?;
        let dir = target.parent().map(Path::to_path_buf).unwrap_or_default();
        let base = base_name(path, true);
        factored.push(dir.join(format!("{}{}", base, JSON_EXT)));
        mergelists.push(dir.join(format!("{}{}", base, MERGELIST_EXT)));
    }
    Ok(FactorLayout {
        common,
        factored,
        mergelists,
    })
}

/// File name without its `.json` extension, or without `.merged.json` when
/// `strip_merged` is set and there is a name before it.
fn base_name(path: &Path, strip_merged: bool) -> String {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    if !ends_with_ignore_case(&name, JSON_EXT) {
        log::warn!("No conventional \"{}\" extension for {}", JSON_EXT, path.display());
        return name;
    }
    if strip_merged && name.len() > MERGED_EXT.len() && ends_with_ignore_case(&name, MERGED_EXT)
    {
        return name[..name.len() - MERGED_EXT.len()].to_string();
    }
    name[..name.len() - JSON_EXT.len()].to_string()
}
