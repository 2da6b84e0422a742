//! Storage trait
//!
//! The crawler only ever needs two filesystem capabilities: ask whether a
//! destination already holds a file, and write bytes to a destination.

use crate::MirrorError;
use std::path::Path;

/// Result type for storage operations
pub type StorageResult<T> = Result<T, MirrorError>;

/// Trait for storage backend implementations
///
/// Failures are reported as [`MirrorError::Filesystem`] so the driver can
/// recover from them per resource.
pub trait Storage {
    /// Returns true if a regular file already exists at `path`
    fn exists(&self, path: &Path) -> bool;

    /// Writes `contents` to `path`, creating missing parent directories and
    /// replacing any existing file
    fn save(&mut self, path: &Path, contents: &[u8]) -> StorageResult<()>;
}
