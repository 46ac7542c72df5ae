//! Symbol definitions and interpolation
//!
//! A symbol definition file is a JSON object. String-valued keys are global
//! symbols; object-valued keys are named sets of string-valued symbols:
//!
//! ```json
//! { "cat":   { "name": "Felix", "noise": "meow" },
//!   "snake": { "name": "Kaa", "noise": "hiss", "skin": "scales" },
//!   "skin": "fur" }
//! ```
//!
//! Every symbol and set name must be an identifier (a letter or underscore,
//! then letters, digits or underscores). Resolving a set yields the global
//! symbols with that set's entries layered on top; the store itself is never
//! modified.
//!
//! Interpolation replaces each `${name}` in string values with the symbol's
//! value. Keys are never touched, and replaced text is not scanned again.
//! Placeholders naming an unknown symbol are left as written.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde_json::Value;

use crate::cache::DocumentCache;
use crate::defaults::MERGELIST_EXT;
use crate::document::{type_name, Document};
use crate::error::{Error, Result};
use crate::path::ends_with_ignore_case;

static IDENTIFIER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\d\W]\w*$").expect("identifier pattern is valid")
});

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\{([^\d\W]\w*)\}").expect("placeholder pattern is valid")
});

/// True if `name` may be used as a symbol or set name.
pub fn is_identifier(name: &str) -> bool {
    IDENTIFIER.is_match(name)
}

/// Parsed contents of a symbol definition file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolStore {
    source_file: PathBuf,
    globals: BTreeMap<String, String>,
    sets: BTreeMap<String, BTreeMap<String, String>>,
}

impl SymbolStore {
    /// Load and parse a symbol definition file through the document cache.
    pub fn load(cache: &DocumentCache, path: &Path) -> Result<Self> {
        let document = cache.read(path)?;
        Self::parse(&document, path)
    }

    /// Parse a symbol definition document read from `source_file`.
    pub fn parse(document: &Document, source_file: &Path) -> Result<Self> {
        let malformed = |message: String| Error::MalformedDocument {
            path: source_file.to_path_buf(),
            message,
        };
        let Value::Object(entries) = document else {
            return Err(malformed(format!(
                "a symbol definition file must be an object, found {}",
                type_name(document)
            )));
        };

        let check_name = |name: &str| {
            if is_identifier(name) {
                Ok(())
            } else {
                Err(malformed(format!("symbol name \"{}\" is not an identifier", name)))
            }
        };

        let mut globals = BTreeMap::new();
        let mut sets = BTreeMap::new();
        for (name, value) in entries {
            check_name(name)?;
            match value {
                Value::String(text) => {
                    globals.insert(name.clone(), text.clone());
                }
                Value::Object(members) => {
                    let mut set = BTreeMap::new();
                    for (member, member_value) in members {
                        check_name(member)?;
                        let Value::String(text) = member_value else {
                            return Err(malformed(format!(
                                "invalid value for symbol \"{}\" in set \"{}\": expected a string, found {}",
                                member,
                                name,
                                type_name(member_value)
                            )));
                        };
                        set.insert(member.clone(), text.clone());
                    }
                    sets.insert(name.clone(), set);
                }
                other => {
                    return Err(malformed(format!(
                        "invalid value for symbol \"{}\": expected a string or an object, found {}",
                        name,
                        type_name(other)
                    )));
                }
            }
        }

        Ok(Self {
            source_file: source_file.to_path_buf(),
            globals,
            sets,
        })
    }

    /// The file the symbols were read from.
    pub fn source_file(&self) -> &Path {
        &self.source_file
    }

    /// Names of the named sets, sorted.
    pub fn set_names(&self) -> impl Iterator<Item = &str> {
        self.sets.keys().map(String::as_str)
    }

    /// Build the symbol table for `set`, or for the global symbols alone.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownSymbolSet` if `set` is not defined.
    pub fn resolve(&self, set: Option<&str>) -> Result<SymbolTable> {
        let mut symbols = self.globals.clone();
        if let Some(set) = set {
            let members = self.sets.get(set).ok_or_else(|| Error::UnknownSymbolSet {
                set: set.to_string(),
                source_file: self.source_file.clone(),
            })?;
            for (name, value) in members {
                symbols.insert(name.clone(), value.clone());
            }
        }
        Ok(SymbolTable { symbols })
    }
}

/// Effective symbols for one interpolation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SymbolTable {
    symbols: BTreeMap<String, String>,
}

impl SymbolTable {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.symbols.get(name).map(String::as_str)
    }

    /// Substitute symbols into every string value of `document`.
    pub fn interpolate(&self, document: &mut Document) -> InterpolationReport {
        let mut report = InterpolationReport {
            replacement_counts: self.symbols.keys().map(|k| (k.clone(), 0)).collect(),
            unresolved: BTreeSet::new(),
        };
        self.interpolate_value(document, &mut report);
        for name in &report.unresolved {
            log::debug!("Symbol \"{}\" is not defined; placeholder left as is", name);
        }
        report
    }

    fn interpolate_value(&self, value: &mut Value, report: &mut InterpolationReport) {
        match value {
            Value::String(text) => {
                if let Some(replaced) = self.replace(text, report) {
                    *text = replaced;
                }
            }
            Value::Array(items) => {
                for item in items {
                    self.interpolate_value(item, report);
                }
            }
            Value::Object(map) => {
                for (_, item) in map.iter_mut() {
                    self.interpolate_value(item, report);
                }
            }
            Value::Null | Value::Bool(_) | Value::Number(_) => {}
        }
    }

    /// Returns the substituted text, or `None` if `text` has no placeholders.
    fn replace(&self, text: &str, report: &mut InterpolationReport) -> Option<String> {
        if !PLACEHOLDER.is_match(text) {
            return None;
        }
        let replaced = PLACEHOLDER.replace_all(text, |caps: &Captures| {
            let name = &caps[1];
            match self.get(name) {
                Some(value) => {
                    *report.replacement_counts.entry(name.to_string()).or_insert(0) += 1;
                    value.to_string()
                }
                None => {
                    report.unresolved.insert(name.to_string());
                    caps[0].to_string()
                }
            }
        });
        Some(replaced.into_owned())
    }
}

/// Outcome of one interpolation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InterpolationReport {
    /// Number of replacements per defined symbol, zero for unused symbols.
    pub replacement_counts: BTreeMap<String, usize>,
    /// Names found in placeholders that have no definition.
    pub unresolved: BTreeSet<String>,
}

impl InterpolationReport {
    pub fn total_replacements(&self) -> usize {
        self.replacement_counts.values().sum()
    }
}

/// Derive the symbol set name from a merge list's file name.
///
/// `[*.]<set>.mergelist.json` names the set `<set>`. The bare name
/// `mergelist.json`, or any name without the merge-list suffix, names no set
/// and means global symbols only.
///
/// # Errors
///
/// Returns `Error::AmbiguousSymbolSetName` when nothing or only a dot remains
/// where the set name should be, as in `.mergelist.json` or
/// `a..mergelist.json`.
pub fn derive_set_name(mergelist: &Path) -> Result<Option<String>> {
    let file_name = mergelist
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    if file_name.eq_ignore_ascii_case(&MERGELIST_EXT[1..])
        || !ends_with_ignore_case(&file_name, MERGELIST_EXT)
    {
        return Ok(None);
    }

    let stem = &file_name[..file_name.len() - MERGELIST_EXT.len()];
    let name = match stem.rfind('.') {
        Some(dot) => &stem[dot + 1..],
        None => stem,
    };
    if name.is_empty() {
        return Err(Error::AmbiguousSymbolSetName { file_name });
    }
    Ok(Some(name.to_string()))
}
