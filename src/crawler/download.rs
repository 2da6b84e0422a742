//! Idempotent asset downloads
//!
//! Existence on disk is the only cache key: a file that is already present
//! is never fetched again, within a run or across runs.

use crate::crawler::fetcher::Fetcher;
use crate::storage::Storage;
use crate::MirrorError;
use std::path::Path;
use url::Url;

/// What the download guard did for one asset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadOutcome {
    /// Fetched and written, with the number of bytes saved
    Downloaded(usize),

    /// A file was already present; nothing was fetched
    AlreadyPresent,
}

/// Downloads `url` to `local_path` unless a file is already there
///
/// Missing parent directories are created by the storage backend.
pub async fn download_if_absent<S: Storage>(
    fetcher: &Fetcher,
    storage: &mut S,
    url: &Url,
    local_path: &Path,
) -> Result<DownloadOutcome, MirrorError> {
    if storage.exists(local_path) {
        tracing::debug!("Already present: {}", local_path.display());
        return Ok(DownloadOutcome::AlreadyPresent);
    }

    tracing::info!("Downloading {} to {}", url, local_path.display());
    let bytes = fetcher.fetch_bytes(url).await?;
    storage.save(local_path, &bytes)?;

    Ok(DownloadOutcome::Downloaded(bytes.len()))
}
