//! Site-Mirror: a single-site web mirroring tool
//!
//! This crate fetches a root page, extracts same-host links and page assets
//! (stylesheets, scripts, images, icons), maps every reference onto a local
//! filesystem destination, downloads assets that are not already on disk and
//! repeats for every newly discovered same-host page until the frontier is
//! exhausted.

pub mod config;
pub mod crawler;
pub mod output;
pub mod state;
pub mod storage;
pub mod url;

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for Site-Mirror operations
#[derive(Debug, Error)]
pub enum MirrorError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    Client(reqwest::Error),

    #[error("Transport error for {url}: {source}")]
    Transport { url: String, source: reqwest::Error },

    #[error("HTTP {status} for {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("Filesystem error at {}: {source}", .path.display())]
    Filesystem {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Malformed URL: {0}")]
    Malformed(#[from] UrlError),

    #[error("Invalid state transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: state::PageState,
        to: state::PageState,
    },
}

/// The closed set of failures the crawl driver recovers from inline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Connection refused, DNS failure, timeout, non-success status
    Transport,
    /// Could not create a directory or write a file
    Filesystem,
    /// A reference could not be turned into a usable URL
    Malformed,
}

impl MirrorError {
    /// Classifies the error into a recoverable kind
    ///
    /// Returns `None` for errors that indicate a defect or a fatal setup
    /// problem; those must propagate and fail the run.
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            Self::Transport { .. } | Self::HttpStatus { .. } => Some(ErrorKind::Transport),
            Self::Filesystem { .. } => Some(ErrorKind::Filesystem),
            Self::Malformed(_) => Some(ErrorKind::Malformed),
            Self::Config(_) | Self::Client(_) | Self::InvalidTransition { .. } => None,
        }
    }

    /// Returns true if the driver may log this error and keep crawling
    pub fn is_recoverable(&self) -> bool {
        self.kind().is_some()
    }

    pub(crate) fn filesystem(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Filesystem {
            path: path.into(),
            source,
        }
    }
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Unsupported scheme in reference: {0}")]
    UnsupportedScheme(String),

    #[error("Missing host in URL: {0}")]
    MissingHost(String),

    #[error("Empty reference")]
    Empty,

    #[error("Credentials in URL are not allowed (host {0})")]
    Credentials(String),
}

/// Result type alias for Site-Mirror operations
pub type Result<T> = std::result::Result<T, MirrorError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{mirror, Coordinator};
pub use output::CrawlReport;
pub use state::{CrawlState, PageState};
pub use crate::url::{map_to_local_path, resolve, RootHost};
