//! Crawler module for mirroring a site
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching of pages and assets
//! - HTML parsing and reference extraction
//! - Idempotent asset downloads
//! - Overall crawl coordination

mod coordinator;
mod download;
mod fetcher;
mod parser;

pub use coordinator::{mirror, Coordinator};
pub use download::{download_if_absent, DownloadOutcome};
pub use fetcher::{build_http_client, user_agent, Fetcher, PageBody};
pub use parser::{extract_references, parse_html, AssetKind, AssetReference, ParsedPage, TagClass};
