//! In-process caching of parsed documents
//!
//! A directory walk composes many merge lists that share fragments and symbol
//! files. The cache keeps each parsed document keyed by its canonical path for
//! the lifetime of one command, so shared fragments are read from disk once.
//! Cached documents are returned as clones; composition mutates its own copy.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::document::Document;
use crate::error::{Error, Result};
use crate::path::canonical;

/// In-process cache for parsed documents
#[derive(Debug, Clone)]
pub struct DocumentCache {
    cache: Arc<Mutex<HashMap<PathBuf, Document>>>,
}

impl DocumentCache {
    /// Create a new empty document cache
    pub fn new() -> Self {
        Self {
            cache: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Read a document through the cache.
    pub fn read(&self, path: &Path) -> Result<Document> {
        let key = canonical(path);
        let read_path = key.clone();
        self.get_or_process(key, || crate::filesystem::read_document(&read_path))
    }

    /// Get a cached document, or compute and cache it if not present
    pub fn get_or_process<F>(&self, key: PathBuf, processor: F) -> Result<Document>
    where
        F: FnOnce() -> Result<Document>,
    {
        {
            let cache = self.lock()?;
            if let Some(cached) = cache.get(&key) {
                return Ok(cached.clone());
            }
        }

        // Computed outside the lock; failures are not cached.
        let result = processor()?;

        {
            let mut cache = self.lock()?;
            cache.insert(key, result.clone());
        }

        Ok(result)
    }

    /// Check if a document is cached
    pub fn contains(&self, path: &Path) -> Result<bool> {
        Ok(self.lock()?.contains_key(&canonical(path)))
    }

    /// Get the number of cached documents
    pub fn len(&self) -> Result<usize> {
        Ok(self.lock()?.len())
    }

    /// Check if cache is empty
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.lock()?.is_empty())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<PathBuf, Document>>> {
        self.cache.lock().map_err(|_| Error::LockPoisoned {
            context: "document cache".to_string(),
        })
    }
}

impl Default for DocumentCache {
    fn default() -> Self {
        Self::new()
    }
}
