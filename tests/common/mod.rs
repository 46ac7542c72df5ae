//! Shared test utilities for integration and E2E tests.
//!
//! ## Usage
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! #[test]
//! fn test_example() {
//!     let fixture = TestFixture::new().with_animals();
//!     fixture.command().arg("merge").arg("cat.mergelist.json").assert().success();
//! }
//! ```

use assert_fs::prelude::*;
use serde_json::Value;
use std::path::Path;

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    pub use assert_cmd::cargo::cargo_bin_cmd;
    pub use assert_fs::prelude::*;
    #[allow(unused_imports)]
    pub use assert_fs::TempDir;
    pub use predicates::prelude::*;
    #[allow(unused_imports)]
    pub use serde_json::json;

    #[allow(unused_imports)]
    pub use super::fragments;
    pub use super::TestFixture;
}

/// Fragment and symbol documents used across tests.
#[allow(dead_code)]
pub mod fragments {
    /// Global `skin` plus one named set per animal.
    pub const ANIMAL_SYMBOLS: &str = r#"{
    "cat": {"name": "Felix", "noise": "meow"},
    "dog": {"name": "Fido", "noise": "woof"},
    "snake": {"name": "Kaa", "noise": "hiss", "skin": "scales"},
    "skin": "fur"
}"#;

    pub const ANIMAL: &str = r#"{"text": "${name} has ${skin} and says ${noise}."}"#;

    pub const BASE: &str = r#"{"db": {"host": "localhost", "port": 5432}, "tags": ["a"]}"#;

    pub const PROD: &str = r#"{"db": {"host": "db.example.org"}, "tags": ["b"]}"#;
}

/// A temporary directory populated with input files.
pub struct TestFixture {
    temp_dir: assert_fs::TempDir,
}

impl TestFixture {
    /// Create a new test fixture with an empty temporary directory.
    pub fn new() -> Self {
        Self {
            temp_dir: assert_fs::TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Add a file with the given path and content; parent directories are created.
    pub fn with_file(self, path: &str, content: &str) -> Self {
        self.temp_dir
            .child(path)
            .write_str(content)
            .expect("Failed to write file");
        self
    }

    /// Add `symbols.json`, `animal.json` and one merge list per animal.
    #[allow(dead_code)]
    pub fn with_animals(self) -> Self {
        let mut fixture = self
            .with_file("symbols.json", fragments::ANIMAL_SYMBOLS)
            .with_file("animal.json", fragments::ANIMAL);
        for animal in ["cat", "dog", "snake"] {
            fixture = fixture.with_file(
                &format!("{}.mergelist.json", animal),
                r#"["symbols.json", "animal.json"]"#,
            );
        }
        fixture
    }

    /// Get the path to the temporary directory.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Create a child path in the temp directory.
    #[allow(dead_code)]
    pub fn child(&self, path: &str) -> assert_fs::fixture::ChildPath {
        self.temp_dir.child(path)
    }

    /// Parse the JSON file at `path`, relative to the temp directory.
    #[allow(dead_code)]
    pub fn read_json(&self, path: &str) -> Value {
        let text = std::fs::read_to_string(self.path().join(path))
            .unwrap_or_else(|err| panic!("Failed to read {}: {}", path, err));
        serde_json::from_str(&text).unwrap_or_else(|err| panic!("Invalid JSON in {}: {}", path, err))
    }

    /// Create a command configured to run in this fixture's directory.
    pub fn command(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("json-compose");
        cmd.current_dir(self.path());
        cmd
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}
