//! JSON documents and key paths
//!
//! A [`Document`] is a parsed JSON value. Composition only ever descends into
//! objects: arrays and scalars are opaque leaves that are replaced as a whole.

use std::fmt;
use std::path::Path;

use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// A parsed JSON document.
pub type Document = Value;

/// The object form of a document.
pub type Object = Map<String, Value>;

/// Returns a short name for the JSON type of `value`, for error messages.
pub fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Returns the document as an object, or a [`Error::MalformedDocument`]
/// naming `path` when it is not one.
pub fn require_object<'a>(document: &'a Value, path: &Path) -> Result<&'a Object> {
    document.as_object().ok_or_else(|| Error::MalformedDocument {
        path: path.to_path_buf(),
        message: format!("expected a JSON object, found {}", type_name(document)),
    })
}

/// The sequence of object keys leading from the document root to a value.
///
/// Key paths are kept as segment lists, so keys that themselves contain dots
/// never collide. The display form joins segments with `.`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KeyPath(Vec<String>);

impl KeyPath {
    /// The empty path, denoting the document root.
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Returns a new path extended by one key.
    pub fn child(&self, key: &str) -> Self {
        let mut segments = self.0.clone();
        segments.push(key.to_string());
        Self(segments)
    }

    /// The key segments.
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<String>> for KeyPath {
    fn from(segments: Vec<String>) -> Self {
        Self(segments)
    }
}

impl From<&[&str]> for KeyPath {
    fn from(segments: &[&str]) -> Self {
        Self(segments.iter().map(|s| s.to_string()).collect())
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("."))
    }
}
