//! In-memory storage, used by tests

use crate::storage::traits::{Storage, StorageResult};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Keeps "written" files in a map instead of on disk
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    files: HashMap<PathBuf, Vec<u8>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the contents saved at `path`, if any
    pub fn get(&self, path: &Path) -> Option<&[u8]> {
        self.files.get(path).map(Vec::as_slice)
    }

    /// Number of files saved so far
    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Paths of all saved files, sorted
    pub fn paths(&self) -> Vec<&Path> {
        let mut paths: Vec<&Path> = self.files.keys().map(PathBuf::as_path).collect();
        paths.sort();
        paths
    }
}

impl Storage for MemoryStorage {
    fn exists(&self, path: &Path) -> bool {
        self.files.contains_key(path)
    }

    fn save(&mut self, path: &Path, contents: &[u8]) -> StorageResult<()> {
        self.files.insert(path.to_path_buf(), contents.to_vec());
        Ok(())
    }
}
