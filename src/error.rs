//! # Error Handling
//!
//! This module defines the centralized error type for the `json-compose`
//! library. It uses the `thiserror` library to build one `Error` enum that
//! covers every anticipated failure mode, with enough context in each variant
//! (paths, key paths, symbol set names) to locate the problem in the input
//! tree.
//!
//! ## Key Components
//!
//! - **`Error`**: The main enum. Variants follow the failure taxonomy of the
//!   composition engine:
//!   - malformed documents (wrong top-level shape, invalid symbol names,
//!     unparseable JSON),
//!   - merge-list cycles and dangling references,
//!   - object/non-object type conflicts during a deep merge,
//!   - symbol set lookup and symbol file conflicts,
//!   - malformed directory override or exclusion files,
//!   - invalid option combinations,
//!   - filesystem, serialization and glob failures.
//!
//! - **`Result<T>`**: A type alias for `std::result::Result<T, Error>`.
//!
//! Errors raised while composing a single merge list during a directory walk
//! are collected per file by [`crate::merge_all`]; everything else propagates
//! to the caller.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for json-compose operations
#[derive(Error, Debug)]
pub enum Error {
    /// A document does not have the shape required where it is used, or its
    /// content could not be decoded as JSON.
    #[error("Malformed document {}: {message}", path.display())]
    MalformedDocument { path: PathBuf, message: String },

    /// A document to read does not exist.
    ///
    /// Kept distinct from [`Error::MalformedDocument`] so callers can tell a
    /// missing file from bad content.
    #[error("File not found: {}", path.display())]
    NotFound { path: PathBuf },

    /// A merge list references itself, directly or through other merge lists.
    #[error("Cycle detected in merge lists: {cycle}")]
    CycleDetected { cycle: String },

    /// A merge-list entry does not resolve to an existing file.
    #[error("Invalid reference \"{entry}\" in {}: {} is not a file", mergelist.display(), resolved.display())]
    InvalidReference {
        mergelist: PathBuf,
        entry: String,
        resolved: PathBuf,
    },

    /// An object would be merged with a non-object at the same key path.
    #[error(
        "Cannot merge {target_type} with {source_type} at '{key_path}' (from {})",
        origin.display()
    )]
    TypeConflict {
        key_path: String,
        origin: PathBuf,
        target_type: &'static str,
        source_type: &'static str,
    },

    /// A requested symbol set is not defined in the symbol definition file.
    #[error("No symbol set \"{set}\" in symbol definition file {}", source_file.display())]
    UnknownSymbolSet { set: String, source_file: PathBuf },

    /// A symbol set name could not be derived from a merge-list file name.
    #[error("Could not determine symbol set name from merge list file name \"{file_name}\"")]
    AmbiguousSymbolSetName { file_name: String },

    /// The symbol definition files referenced by a merge list do not fit the
    /// requested processing.
    #[error("Symbol definition conflict in {}: {message}", mergelist.display())]
    SymbolDefinitionConflict { mergelist: PathBuf, message: String },

    /// A directory override or exclusion file is malformed or names a file
    /// that is not there.
    #[error("Directory override error in {}: {message}", path.display())]
    DirectoryOverride { path: PathBuf, message: String },

    /// Options are invalid on their own or in combination.
    #[error("Invalid options: {message}")]
    InvalidOptions { message: String },

    /// An error occurred while reading or writing the on-disk tree.
    #[error("Filesystem operation error: {message}")]
    Filesystem { message: String },

    /// An error occurred with a path-related operation.
    #[error("Path operation error: {message}")]
    Path { message: String },

    /// An error occurred during serialization.
    #[error("Serialization error: {message}")]
    Serialization { message: String },

    /// An error indicating that a mutex or other lock has been poisoned.
    #[error("Lock poisoned: {context}")]
    LockPoisoned { context: String },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A glob pattern error, wrapped from `glob::PatternError`.
    #[error("Glob pattern error: {0}")]
    Glob(#[from] glob::PatternError),
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
