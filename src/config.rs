//! # Merge Options and In-Tree Configuration
//!
//! This module defines how a merge list is to be processed with respect to
//! symbol interpolation, and the schema of the per-directory override file
//! that changes those options for a subtree during a directory walk.
//!
//! ## Key Components
//!
//! - **`SymbolMode`**: which symbols, if any, are substituted into a merged
//!   document. Parsed from the command line (case-insensitive) and from
//!   override files (upper case).
//!
//! - **`MergeOptions`**: a symbol mode plus the optional symbol set name that
//!   the `NAMED` mode requires. [`MergeOptions::validate`] enforces the
//!   combination rules for both sources.
//!
//! - **`OverrideFile`**: the on-disk form of `mergeall.args.json`, e.g.
//!
//! ```json
//! { "--mode4symbols": "NAMED", "--symset": "ifrs" }
//! ```

use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// How symbol definition files referenced by a merge list are applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[value(rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum SymbolMode {
    /// Write the global-symbol output, plus one output per named set in a
    /// subdirectory named after the set
    Dir,
    /// Fail if the merge list references a symbol file
    Error,
    /// Use the named set derived from the merge list's own file name
    #[default]
    Fname,
    /// Use global symbols only
    Global,
    /// Merge without substituting symbols
    Ignore,
    /// Use the set given with --symset
    Named,
}

impl fmt::Display for SymbolMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SymbolMode::Dir => "DIR",
            SymbolMode::Error => "ERROR",
            SymbolMode::Fname => "FNAME",
            SymbolMode::Global => "GLOBAL",
            SymbolMode::Ignore => "IGNORE",
            SymbolMode::Named => "NAMED",
        };
        f.write_str(name)
    }
}

/// Options controlling the composition of one merge list.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MergeOptions {
    pub mode: SymbolMode,
    pub symset: Option<String>,
}

impl MergeOptions {
    /// Create options and check that they are consistent.
    pub fn new(mode: SymbolMode, symset: Option<String>) -> Result<Self> {
        let options = Self { mode, symset };
        options.validate()?;
        Ok(options)
    }

    /// A set name is required by `NAMED` and rejected by every other mode.
    pub fn validate(&self) -> Result<()> {
        match (&self.mode, &self.symset) {
            (SymbolMode::Named, None) => Err(Error::InvalidOptions {
                message: "symbol mode NAMED requires a symbol set name (--symset)".to_string(),
            }),
            (SymbolMode::Named, Some(name)) if name.is_empty() => Err(Error::InvalidOptions {
                message: "symbol set name must not be empty".to_string(),
            }),
            (SymbolMode::Named, Some(_)) => Ok(()),
            (mode, Some(name)) => Err(Error::InvalidOptions {
                message: format!(
                    "symbol set \"{}\" given, but symbol mode is {} (use NAMED)",
                    name, mode
                ),
            }),
            (_, None) => Ok(()),
        }
    }
}

impl fmt::Display for MergeOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.symset {
            Some(set) => write!(f, "{} (symset {})", self.mode, set),
            None => write!(f, "{}", self.mode),
        }
    }
}

/// The contents of a directory override file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OverrideFile {
    #[serde(rename = "--mode4symbols")]
    pub mode: SymbolMode,
    #[serde(rename = "--symset", default)]
    pub symset: Option<String>,
}

impl OverrideFile {
    /// Validate the file's contents as merge options.
    pub fn into_options(self) -> Result<MergeOptions> {
        MergeOptions::new(self.mode, self.symset)
    }
}
