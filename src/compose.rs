//! Composition of a single merge list
//!
//! Composing a merge list means:
//!
//! 1. resolving it to its leaf files ([`crate::mergelist`]),
//! 2. setting aside the symbol definition file, if any (at most one),
//! 3. merging the remaining fragments in order ([`crate::merge`]),
//! 4. interpolating symbols as selected by the [`SymbolMode`],
//! 5. writing the result.
//!
//! In [`SymbolMode::Dir`] one merge produces several outputs: the
//! global-symbol document at the target path, plus one document per named
//! set at `<target dir>/<set>/<target name>`. If any of them cannot be
//! written, the ones already written are removed.

use std::path::{Path, PathBuf};

use crate::cache::DocumentCache;
use crate::config::{MergeOptions, SymbolMode};
use crate::defaults::MODE_KEY;
use crate::document::Document;
use crate::error::{Error, Result};
use crate::filesystem::{remove_files, write_document};
use crate::merge::{merge_documents, Fragment};
use crate::mergelist::MergeListResolver;
use crate::path::is_symbol_file;
use crate::symbols::{derive_set_name, SymbolStore, SymbolTable};

/// A merge list split into the fragments to merge and its symbol file.
#[derive(Debug, Clone)]
pub struct Prepared {
    pub fragments: Vec<PathBuf>,
    pub symbols: Option<SymbolStore>,
}

/// One document to produce from a merged result.
#[derive(Debug, Clone)]
struct Output {
    /// Subdirectory of the target directory, for per-set outputs.
    subdir: Option<String>,
    symbols: Option<SymbolTable>,
}

/// Composes merge lists using a shared document cache.
pub struct Composer<'a> {
    cache: &'a DocumentCache,
}

impl<'a> Composer<'a> {
    pub fn new(cache: &'a DocumentCache) -> Self {
        Self { cache }
    }

    /// Resolve `mergelist` and separate its symbol definition file.
    pub fn prepare(&self, mergelist: &Path) -> Result<Prepared> {
        let resolved = MergeListResolver::new(self.cache).resolve(mergelist)?;
        let mut fragments = Vec::new();
        let mut symbol_file: Option<PathBuf> = None;
        for path in resolved {
            if !is_symbol_file(&path) {
                fragments.push(path);
            } else if let Some(first) = &symbol_file {
                return Err(Error::SymbolDefinitionConflict {
                    mergelist: mergelist.to_path_buf(),
                    message: format!(
                        "a merge list can have at most one symbol definition file, found {} and {}",
                        first.display(),
                        path.display()
                    ),
                });
            } else {
                symbol_file = Some(path);
            }
        }

        let symbols = match symbol_file {
            Some(path) if fragments.is_empty() => {
                return Err(Error::SymbolDefinitionConflict {
                    mergelist: mergelist.to_path_buf(),
                    message: format!(
                        "merge list has only a symbol definition file ({}) and no other files",
                        path.display()
                    ),
                });
            }
            Some(path) => Some(SymbolStore::load(self.cache, &path)?),
            None => None,
        };

        Ok(Prepared { fragments, symbols })
    }

    /// Merge the fragments of a prepared merge list without interpolation.
    pub fn merge_fragments(&self, fragments: &[PathBuf]) -> Result<Document> {
        let mut loaded = Vec::with_capacity(fragments.len());
        for path in fragments {
            loaded.push(Fragment::new(path.clone(), self.cache.read(path)?));
        }
        merge_documents(loaded)
    }

    /// Compose `mergelist` into a document.
    ///
    /// In [`SymbolMode::Dir`] this is the global-symbol document.
    pub fn compose(&self, mergelist: &Path, options: &MergeOptions) -> Result<Document> {
        let prepared = self.prepare(mergelist)?;
        let outputs = plan_outputs(mergelist, &prepared, options)?;
        let mut document = self.merge_fragments(&prepared.fragments)?;
        if let Some(Output {
            symbols: Some(table),
            ..
        }) = outputs.first()
        {
            table.interpolate(&mut document);
        }
        Ok(document)
    }

    /// Compose `mergelist` and write the result to `target`.
    ///
    /// Returns every file written: just `target`, or in DIR mode `target`
    /// followed by the per-set outputs in set-name order.
    pub fn merge_file(
        &self,
        mergelist: &Path,
        target: &Path,
        options: &MergeOptions,
    ) -> Result<Vec<PathBuf>> {
        options.validate()?;
        let prepared = self.prepare(mergelist)?;
        let outputs = plan_outputs(mergelist, &prepared, options)?;
        let merged = self.merge_fragments(&prepared.fragments)?;

        let target_dir = target.parent().unwrap_or_else(|| Path::new(""));
        let file_name = target.file_name().ok_or_else(|| Error::Path {
            message: format!("Output path has no file name: {}", target.display()),
        })?;

        let mut written = Vec::with_capacity(outputs.len());
        for output in outputs {
            let path = match &output.subdir {
                Some(set) => target_dir.join(set).join(file_name),
                None => target.to_path_buf(),
            };
            let mut document = merged.clone();
            if let Some(table) = &output.symbols {
                let report = table.interpolate(&mut document);
                log::debug!(
                    "{} replacements, {} unresolved symbols in {}",
                    report.total_replacements(),
                    report.unresolved.len(),
                    path.display()
                );
            }
            if let Err(err) = write_document(&path, &document) {
                remove_files(&written);
                return Err(err);
            }
            log::info!("Wrote {}", path.display());
            written.push(path);
        }
        Ok(written)
    }
}

/// Decide which documents to produce and with which symbols.
fn plan_outputs(
    mergelist: &Path,
    prepared: &Prepared,
    options: &MergeOptions,
) -> Result<Vec<Output>> {
    let single = |symbols: Option<SymbolTable>| {
        vec![Output {
            subdir: None,
            symbols,
        }]
    };

    let Some(store) = &prepared.symbols else {
        if let Some(set) = &options.symset {
            return Err(Error::SymbolDefinitionConflict {
                mergelist: mergelist.to_path_buf(),
                message: format!(
                    "merge list has no symbol definition file, expected one with symbol set \"{}\"",
                    set
                ),
            });
        }
        return Ok(single(None));
    };

    let outputs = match options.mode {
        SymbolMode::Error => {
            return Err(Error::SymbolDefinitionConflict {
                mergelist: mergelist.to_path_buf(),
                message: format!(
                    "merge list has a symbol definition file ({}) and {} is {}",
                    store.source_file().display(),
                    MODE_KEY,
                    SymbolMode::Error
                ),
            });
        }
        SymbolMode::Ignore => single(None),
        SymbolMode::Global => single(Some(store.resolve(None)?)),
        SymbolMode::Named => single(Some(store.resolve(options.symset.as_deref())?)),
        SymbolMode::Fname => {
            let set = derive_set_name(mergelist)?;
            if set.is_none() {
                log::debug!(
                    "No symbol set name in file name of {}; using global symbols only",
                    mergelist.display()
                );
            }
            single(Some(store.resolve(set.as_deref())?))
        }
        SymbolMode::Dir => {
            let mut outputs = single(Some(store.resolve(None)?));
            for set in store.set_names() {
                outputs.push(Output {
                    subdir: Some(set.to_string()),
                    symbols: Some(store.resolve(Some(set))?),
                });
            }
            outputs
        }
    };
    Ok(outputs)
}
