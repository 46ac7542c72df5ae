//! Deep merge of an ordered sequence of documents
//!
//! The first document is the accumulator and every later one is merged into
//! it with "last wins" semantics (see [`json::merge_objects`]). When several
//! documents are merged, each must be a JSON object. A single document is
//! returned unchanged whatever its shape, so a merge list may name one array
//! or scalar document. No documents at all yields an empty object.

pub mod json;

use std::path::PathBuf;

use crate::document::{require_object, Document, KeyPath, Object};
use crate::error::Result;

/// A document together with the file it was read from.
#[derive(Debug, Clone)]
pub struct Fragment {
    pub origin: PathBuf,
    pub document: Document,
}

impl Fragment {
    pub fn new(origin: impl Into<PathBuf>, document: Document) -> Self {
        Self {
            origin: origin.into(),
            document,
        }
    }
}

/// Merge `fragments` in order into one document.
pub fn merge_documents(fragments: Vec<Fragment>) -> Result<Document> {
    if fragments.len() == 1 {
        return Ok(fragments.into_iter().next().map(|f| f.document).unwrap_or_default());
    }
    for fragment in &fragments {
        require_object(&fragment.document, &fragment.origin)?;
    }

    let mut objects = fragments.into_iter().filter_map(|fragment| match fragment.document {
        Document::Object(map) => Some((fragment.origin, map)),
        _ => None,
    });
    let mut merged: Object = match objects.next() {
        Some((origin, first)) => {
            log::debug!("Merge {}", origin.display());
            first
        }
        None => Object::new(),
    };
    for (origin, source) in objects {
        log::debug!("Merge {}", origin.display());
        json::merge_objects(&mut merged, source, &KeyPath::root(), &origin)?;
    }
    Ok(Document::Object(merged))
}
