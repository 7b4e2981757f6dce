//! File-system boundary
//!
//! Asset and script loading go through this trait so the rest of the
//! engine never touches paths directly: the application roots a
//! [`DiskFs`] at its asset directory, and tests use [`MemoryFs`].

use std::collections::HashMap;
use std::path::PathBuf;
use crate::asset::AssetError;

/// Read-only file access used by all asset loading
pub trait FileSystem {
    /// Read the entire file at an engine-relative path
    fn read(&self, path: &str) -> Result<Vec<u8>, AssetError>;

    /// Whether a file exists at the path
    fn exists(&self, path: &str) -> bool;
}

/// File system rooted at a directory on disk
pub struct DiskFs {
    root: PathBuf,
}

impl DiskFs {
    /// Create a file system rooted at the given directory
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, path: &str) -> PathBuf {
        self.root.join(path.trim_start_matches('/'))
    }
}

impl FileSystem for DiskFs {
    fn read(&self, path: &str) -> Result<Vec<u8>, AssetError> {
        let full = self.resolve(path);
        std::fs::read(&full).map_err(AssetError::from)
    }

    fn exists(&self, path: &str) -> bool {
        self.resolve(path).exists()
    }
}

/// In-memory file system for tests
#[derive(Default)]
pub struct MemoryFs {
    files: HashMap<String, Vec<u8>>,
}

impl MemoryFs {
    /// Create an empty in-memory file system
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file
    pub fn insert(&mut self, path: impl Into<String>, bytes: impl Into<Vec<u8>>) {
        self.files.insert(path.into(), bytes.into());
    }
}

impl FileSystem for MemoryFs {
    fn read(&self, path: &str) -> Result<Vec<u8>, AssetError> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| AssetError::NotFound(path.to_string()))
    }

    fn exists(&self, path: &str) -> bool {
        self.files.contains_key(path)
    }
}
