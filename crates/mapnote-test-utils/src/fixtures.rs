//! Test fixtures for store directories.
//!
//! Provides a temporary directory prepared with a database file, floor maps
//! or configuration, cleaned up when dropped.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// File name of the database inside a store directory.
pub const DATABASE_FILE: &str = "database.json";

/// A database document with one account, one building and one POI.
pub const SAMPLE_DATABASE: &str = r#"{
  "version": 1,
  "accounts": [
    {"ref": 1, "username": "u1", "password_hash": "aGFzaA==", "developer": false}
  ],
  "buildings": [
    {"name": "Hall", "floors": [
      {"ref": 2, "short_name": "1", "long_name": "First", "map_path": "hall/1.svg"}
    ]}
  ],
  "pois": [
    {"name": "Cafe", "description": "Coffee", "x": 10, "y": 20, "favorite_of": [1],
     "floor": 2, "layer": "eateries", "restricted_to": null}
  ]
}
"#;

/// A temporary store directory with configurable contents.
///
/// # Example
///
/// ```rust
/// use mapnote_test_utils::fixtures::{TestDir, SAMPLE_DATABASE};
///
/// let dir = TestDir::new()
///     .with_database(SAMPLE_DATABASE)
///     .with_file("hall/1.svg", "<svg/>")
///     .build();
///
/// assert!(dir.database_path().exists());
/// ```
pub struct TestDir {
    temp_dir: TempDir,
    files: Vec<(PathBuf, String)>,
}

impl TestDir {
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().expect("Failed to create temp directory"),
            files: Vec::new(),
        }
    }

    /// Add a file; the path is relative to the directory root and parent
    /// directories are created automatically.
    pub fn with_file(mut self, path: impl AsRef<Path>, contents: impl Into<String>) -> Self {
        self.files.push((path.as_ref().to_path_buf(), contents.into()));
        self
    }

    /// Add a `database.json` with the given text, valid or not.
    pub fn with_database(self, contents: impl Into<String>) -> Self {
        self.with_file(DATABASE_FILE, contents)
    }

    /// Add a `mapnote.json` configuration file.
    pub fn with_config(self, config: &str) -> Self {
        self.with_file("mapnote.json", config)
    }

    pub fn build(self) -> BuiltTestDir {
        let root = self.temp_dir.path();
        for (path, contents) in &self.files {
            let full_path = root.join(path);
            if let Some(parent) = full_path.parent() {
                fs::create_dir_all(parent).unwrap_or_else(|e| {
                    panic!(
                        "Failed to create parent directory for {}: {}",
                        full_path.display(),
                        e
                    )
                });
            }
            fs::write(&full_path, contents)
                .unwrap_or_else(|e| panic!("Failed to write file {}: {}", full_path.display(), e));
        }

        BuiltTestDir {
            temp_dir: self.temp_dir,
        }
    }
}

impl Default for TestDir {
    fn default() -> Self {
        Self::new()
    }
}

/// A prepared store directory, removed when dropped.
pub struct BuiltTestDir {
    temp_dir: TempDir,
}

impl BuiltTestDir {
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn database_path(&self) -> PathBuf {
        self.path().join(DATABASE_FILE)
    }

    pub fn read_database(&self) -> String {
        self.read_file(DATABASE_FILE)
    }

    pub fn read_file(&self, path: impl AsRef<Path>) -> String {
        let full_path = self.path().join(path.as_ref());
        fs::read_to_string(&full_path)
            .unwrap_or_else(|e| panic!("Failed to read file {}: {}", full_path.display(), e))
    }

    /// Overwrite a file during a test.
    pub fn write_file(&self, path: impl AsRef<Path>, contents: impl AsRef<[u8]>) {
        let full_path = self.path().join(path.as_ref());
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).ok();
        }
        fs::write(&full_path, contents.as_ref())
            .unwrap_or_else(|e| panic!("Failed to write file {}: {}", full_path.display(), e));
    }

    pub fn file_exists(&self, path: impl AsRef<Path>) -> bool {
        self.path().join(path.as_ref()).exists()
    }
}
