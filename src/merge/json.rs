//! JSON object merging
//!
//! Objects are merged key by key, recursing where both sides hold an object.
//! Everything else, arrays included, is a leaf: the source value replaces the
//! target value. An object meeting a non-object at the same key is a
//! [`Error::TypeConflict`].
//!
//! Keys present on both sides are visited in sorted order, then keys only in
//! the source are appended in sorted order.

use std::path::Path;

use serde_json::Value as JsonValue;

use crate::document::{type_name, KeyPath, Object};
use crate::error::{Error, Result};

/// Recursively merge `source` into `target`.
///
/// # Arguments
///
/// * `target` - The object to merge into (modified in place)
/// * `source` - The object to merge from
/// * `key_path` - Location of both objects within their documents
/// * `origin` - File the source object was read from, for error messages
///
/// # Errors
///
/// Returns `Error::TypeConflict` when exactly one side of a shared key is an
/// object. `target` may be partially merged at that point.
pub fn merge_objects(
    target: &mut serde_json::Map<String, JsonValue>,
    mut source: Object,
    key_path: &KeyPath,
    origin: &Path,
) -> Result<()> {
    let mut shared: Vec<String> = source
        .keys()
        .filter(|key| target.contains_key(key.as_str()))
        .cloned()
        .collect();
    shared.sort();

    for key in shared {
        let Some(value) = source.remove(&key) else {
            continue;
        };
        let Some(existing) = target.get_mut(&key) else {
            continue;
        };
        let child_path = key_path.child(&key);

        match (existing, value) {
            (JsonValue::Object(existing_map), JsonValue::Object(value_map)) => {
                log::trace!("Merge objects at '{}'", child_path);
                merge_objects(existing_map, value_map, &child_path, origin)?;
            }
            (existing, value) if existing.is_object() || value.is_object() => {
                return Err(Error::TypeConflict {
                    key_path: child_path.to_string(),
                    origin: origin.to_path_buf(),
                    target_type: type_name(existing),
                    source_type: type_name(&value),
                });
            }
            (existing, value) => {
                if *existing != value {
                    log::trace!("Replace value at '{}' from {}", child_path, origin.display());
                    *existing = value;
                }
            }
        }
    }

    let mut added: Vec<(String, JsonValue)> = source.into_iter().collect();
    added.sort_by(|a, b| a.0.cmp(&b.0));
    for (key, value) in added {
        log::trace!("Add value at '{}' from {}", key_path.child(&key), origin.display());
        target.insert(key, value);
    }

    Ok(())
}
