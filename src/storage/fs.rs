//! Local filesystem storage

use crate::storage::traits::{Storage, StorageResult};
use crate::MirrorError;
use std::fs;
use std::path::Path;

/// Writes mirrored files straight to the local filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct FsStorage;

impl FsStorage {
    pub fn new() -> Self {
        Self
    }
}

impl Storage for FsStorage {
    fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn save(&mut self, path: &Path, contents: &[u8]) -> StorageResult<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| MirrorError::filesystem(parent, e))?;
        }
        fs::write(path, contents).map_err(|e| MirrorError::filesystem(path, e))
    }
}
