//! # JSON Compose Library
//!
//! This library builds JSON documents out of reusable fragments. It is
//! designed to be used by the `json-compose` command-line tool but can also
//! be called directly.
//!
//! ## Quick Example
//!
//! ```
//! use json_compose::merge::{merge_documents, Fragment};
//! use serde_json::json;
//!
//! let merged = merge_documents(vec![
//!     Fragment::new("base.json", json!({"db": {"host": "localhost", "port": 5432}})),
//!     Fragment::new("prod.json", json!({"db": {"host": "db.example.org"}})),
//! ])
//! .unwrap();
//! assert_eq!(merged, json!({"db": {"host": "db.example.org", "port": 5432}}));
//! ```
//!
//! ## Core Concepts
//!
//! - **Merge lists (`mergelist`)**: a JSON array of paths to fragments, resolved
//!   relative to the list. A fragment that is itself a list of paths is
//!   expanded in place; cycles are rejected.
//! - **Deep merge (`merge`)**: objects merge key by key, later fragments win
//!   for scalars and arrays, and an object never silently replaces a
//!   non-object or the other way round.
//! - **Symbols (`symbols`)**: a `symbols.json` fragment defines `${name}`
//!   substitutions, globally and in named sets. The symbol mode
//!   (`config::SymbolMode`) selects which set applies.
//! - **Composition (`compose`)**: one merge list to one output document, or
//!   to one output per symbol set in `DIR` mode.
//! - **Directory walk (`merge_all`, `overrides`)**: every merge list below a
//!   directory is composed into a mirrored output tree, with per-subtree
//!   options and exclusions read from files in the tree.
//! - **Factoring (`factor`)**: the inverse direction; the values a family of
//!   documents share are pulled into one common document, leaving a residual
//!   per input plus a merge list that rebuilds it.
//!
//! Documents are read once per run through a shared cache (`cache`) and are
//! written pretty-printed with four-space indentation (`filesystem`).

pub mod cache;
pub mod compose;
pub mod config;
pub mod defaults;
pub mod document;
pub mod error;
pub mod factor;
pub mod filesystem;
pub mod merge;
pub mod merge_all;
pub mod mergelist;
pub mod output;
pub mod overrides;
pub mod path;
pub mod symbols;

#[cfg(test)]
mod factor_proptest;
#[cfg(test)]
mod path_proptest;
