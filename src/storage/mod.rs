//! Storage module for persisting mirrored files
//!
//! This module handles every write the mirror performs:
//! - Saving page HTML and downloaded assets
//! - Creating missing parent directories
//! - Answering the "already on disk?" question the download guard relies on

mod fs;
mod memory;
mod traits;

pub use fs::FsStorage;
pub use memory::MemoryStorage;
pub use traits::{Storage, StorageResult};
