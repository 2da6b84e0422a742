//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the main crawl loop. For every page taken off the
//! frontier it:
//! - Fetches the page
//! - Extracts and resolves asset and anchor references
//! - Saves the page and downloads its assets
//! - Merges same-host links back into the frontier
//!
//! Work is strictly sequential: one page at a time, one download at a time,
//! and a page's assets are downloaded before its links are followed.

use crate::config::Config;
use crate::crawler::download::{download_if_absent, DownloadOutcome};
use crate::crawler::fetcher::{Fetcher, PageBody};
use crate::crawler::parser::parse_html;
use crate::output::CrawlReport;
use crate::state::{CrawlState, PageState, PageVisit};
use crate::storage::{FsStorage, Storage};
use crate::url::{
    map_to_local_path, page_index_path, parse_root_url, resolve, strip_fragment,
    EXTERNAL_ASSETS_DIR,
};
use crate::Result;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use url::Url;

/// Main crawler coordinator structure
///
/// Owns the crawl state for one run; nothing else mutates it.
pub struct Coordinator<S: Storage = FsStorage> {
    config: Config,
    fetcher: Fetcher,
    storage: S,
    state: CrawlState,
    root_url: Url,
    output_dir: PathBuf,
    report: CrawlReport,
}

impl Coordinator<FsStorage> {
    /// Creates a coordinator that writes the mirror to disk
    ///
    /// # Arguments
    ///
    /// * `config` - The mirror configuration
    /// * `root_url` - The page to start from; `http://` is assumed when no
    ///   scheme is given
    pub fn new(config: Config, root_url: &str) -> Result<Self> {
        Self::with_storage(config, root_url, FsStorage::new())
    }
}

impl<S: Storage> Coordinator<S> {
    /// Creates a coordinator with a custom storage backend
    pub fn with_storage(config: Config, root_url: &str, storage: S) -> Result<Self> {
        let root_url = parse_root_url(root_url)?;
        let state = CrawlState::new(&root_url)?;
        let fetcher = Fetcher::new(&config)?;
        let output_dir = PathBuf::from(&config.output.directory);
        let report = CrawlReport::new(root_url.as_str(), output_dir.clone());

        Ok(Self {
            config,
            fetcher,
            storage,
            state,
            root_url,
            output_dir,
            report,
        })
    }

    /// Records the configuration file hash in the report
    pub fn with_config_hash(mut self, hash: impl Into<String>) -> Self {
        self.report.config_hash = Some(hash.into());
        self
    }

    pub fn root_url(&self) -> &Url {
        &self.root_url
    }

    pub fn state(&self) -> &CrawlState {
        &self.state
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Runs the main crawl loop until the frontier is exhausted or the page
    /// bound is reached
    ///
    /// Transport, filesystem and malformed-URL failures are logged and the
    /// affected page or asset is skipped. Any other error aborts the run.
    pub async fn run(&mut self) -> Result<CrawlReport> {
        tracing::info!(
            "Mirroring {} into {}",
            self.root_url,
            self.output_dir.display()
        );

        let max_pages = u64::from(self.config.crawler.max_pages);

        loop {
            if max_pages > 0 && self.report.pages_visited >= max_pages {
                if self.state.frontier_len() > 0 {
                    tracing::info!(
                        "Page limit of {} reached, {} pages left in frontier",
                        max_pages,
                        self.state.frontier_len()
                    );
                }
                break;
            }

            let Some(url) = self.state.next() else {
                tracing::info!("Frontier is empty, mirror complete");
                break;
            };

            self.visit(url).await?;
        }

        for url in self.state.pending() {
            tracing::debug!("Not visited: {}", url);
        }

        self.report.finish(self.state.frontier_len());

        tracing::info!(
            "Mirror finished: {} pages visited ({} failed), {} assets downloaded, {} URLs handled",
            self.report.pages_visited,
            self.report.pages_failed,
            self.report.assets_downloaded,
            self.state.visited_len()
        );

        Ok(self.report.clone())
    }

    /// Visits a single page, abandoning it on a recoverable error
    async fn visit(&mut self, url: Url) -> Result<()> {
        if self.state.is_visited(&url) {
            tracing::debug!("Already visited: {}", url);
            return Ok(());
        }

        let mut visit = PageVisit::new(url);
        self.report.pages_visited += 1;

        match self.process(&mut visit).await {
            Ok(()) => {
                self.state.mark_visited(visit.url());
                Ok(())
            }
            Err(err) if err.is_recoverable() => {
                tracing::warn!(
                    "Abandoning {} (destination {}) while {}: {}",
                    visit.url(),
                    self.page_path(visit.url()).display(),
                    visit.state(),
                    err
                );
                visit.advance(PageState::Failed)?;
                self.state.mark_failed(visit.url());
                self.report.pages_failed += 1;
                Ok(())
            }
            Err(err) => Err(err),
        }
    }

    /// Walks one page through fetch, extract, persist and expand
    async fn process(&mut self, visit: &mut PageVisit) -> Result<()> {
        visit.advance(PageState::Fetching)?;
        tracing::info!("Crawling {}", visit.url());
        let body = self.fetcher.fetch_page(visit.url()).await?;

        visit.advance(PageState::Extracting)?;
        let html = match body {
            PageBody::Html(html) => html,
            PageBody::Other {
                content_type,
                bytes,
            } => {
                tracing::debug!("{} is {}, storing without extraction", visit.url(), content_type);
                visit.advance(PageState::Persisting)?;
                self.save_document(visit.url(), &bytes)?;
                visit.advance(PageState::Expanding)?;
                visit.advance(PageState::Done)?;
                return Ok(());
            }
        };
        let (assets, links) = self.extract(&html);

        visit.advance(PageState::Persisting)?;
        self.save_page(visit.url(), &html)?;
        self.download_assets(&assets).await?;

        visit.advance(PageState::Expanding)?;
        self.expand(&links);

        visit.advance(PageState::Done)?;
        Ok(())
    }

    /// Resolves the page's asset and anchor references, de-duplicated in
    /// first-seen order
    fn extract(&mut self, html: &str) -> (Vec<Url>, Vec<Url>) {
        let parsed = parse_html(html);

        let assets = self.resolve_all(parsed.assets.iter().map(|a| a.reference.as_str()));
        let links = self.resolve_all(parsed.links.iter().map(String::as_str));

        tracing::debug!(
            "Found {} assets and {} links",
            assets.len(),
            links.len()
        );

        (assets, links)
    }

    fn resolve_all<'a>(&mut self, references: impl Iterator<Item = &'a str>) -> Vec<Url> {
        let mut seen = HashSet::new();
        let mut urls = Vec::new();

        for reference in references {
            match resolve(reference, self.state.root_host()) {
                Ok(url) => {
                    let url = strip_fragment(&url);
                    if seen.insert(url.clone()) {
                        urls.push(url);
                    }
                }
                Err(err) => {
                    tracing::debug!("Skipping reference {:?}: {}", reference, err);
                    self.report.references_skipped += 1;
                }
            }
        }

        urls
    }

    /// Where a page is written: `index.html` under its mapped path for
    /// directory-style pages, the mapped path itself for `.html` pages
    fn page_path(&self, url: &Url) -> PathBuf {
        if is_file_page(url) {
            map_to_local_path(url, &self.output_dir, self.state.root_host())
        } else {
            page_index_path(url, &self.output_dir, self.state.root_host())
        }
    }

    /// Saves page HTML
    ///
    /// Pages whose path ends in `.html` are only written when
    /// `save-file-pages` is enabled. A failed write is logged with the
    /// destination and does not stop the page's assets or links from being
    /// processed.
    fn save_page(&mut self, url: &Url, html: &str) -> Result<()> {
        if is_file_page(url) && !self.config.output.save_file_pages {
            tracing::debug!("Not saving {}, file pages are only followed", url);
            return Ok(());
        }

        let path = self.page_path(url);
        self.write_page(url, &path, html.as_bytes())
    }

    /// Stores a non-HTML page body at its mapped path unless a file is
    /// already there
    fn save_document(&mut self, url: &Url, bytes: &[u8]) -> Result<()> {
        let path = map_to_local_path(url, &self.output_dir, self.state.root_host());
        if is_bare_root(&path, &self.output_dir) {
            tracing::debug!("No file name for {}, not saving", url);
            return Ok(());
        }
        if self.storage.exists(&path) {
            tracing::debug!("Already present: {}", path.display());
            return Ok(());
        }

        self.write_page(url, &path, bytes)
    }

    fn write_page(&mut self, url: &Url, path: &Path, contents: &[u8]) -> Result<()> {
        match self.storage.save(path, contents) {
            Ok(()) => {
                self.report.pages_saved += 1;
                tracing::debug!("Saved {} to {}", url, path.display());
                Ok(())
            }
            Err(err) if err.is_recoverable() => {
                tracing::warn!("Failed to save {} to {}: {}", url, path.display(), err);
                self.report.page_write_failures += 1;
                Ok(())
            }
            Err(err) => Err(err),
        }
    }

    /// Downloads each asset not yet visited in this run
    ///
    /// Per-asset transport and filesystem failures are logged with the URL
    /// and destination; they never abandon the page.
    async fn download_assets(&mut self, assets: &[Url]) -> Result<()> {
        for asset in assets {
            if self.state.is_visited(asset) {
                continue;
            }

            let local_path = map_to_local_path(asset, &self.output_dir, self.state.root_host());
            if is_bare_root(&local_path, &self.output_dir) {
                tracing::debug!("No file name for asset {}, skipping", asset);
                self.report.references_skipped += 1;
                self.state.mark_visited(asset);
                continue;
            }

            match download_if_absent(&self.fetcher, &mut self.storage, asset, &local_path).await {
                Ok(DownloadOutcome::Downloaded(bytes)) => {
                    self.report.assets_downloaded += 1;
                    self.report.bytes_downloaded += bytes as u64;
                }
                Ok(DownloadOutcome::AlreadyPresent) => {
                    self.report.assets_present += 1;
                }
                Err(err) if err.is_recoverable() => {
                    tracing::warn!(
                        "Failed to download {} to {}: {}",
                        asset,
                        local_path.display(),
                        err
                    );
                    self.report.asset_failures += 1;
                }
                Err(err) => return Err(err),
            }

            self.state.mark_visited(asset);
        }

        Ok(())
    }

    /// Merges same-host links into the frontier
    fn expand(&mut self, links: &[Url]) {
        for link in links {
            if self.state.enqueue(link) {
                tracing::trace!("Queued {}", link);
                self.report.links_queued += 1;
            }
        }
    }
}

fn is_file_page(url: &Url) -> bool {
    url.path().ends_with(".html")
}

/// True if a URL maps onto the output root or the external assets
/// directory itself, leaving no file name to write to
fn is_bare_root(local_path: &Path, output_dir: &Path) -> bool {
    local_path == output_dir
        || local_path == output_dir.join(EXTERNAL_ASSETS_DIR)
}

/// Mirrors the site rooted at `root_url` onto the local filesystem
///
/// This is the main entry point. It will:
/// 1. Parse the root URL and seed the frontier with it
/// 2. Build the HTTP client
/// 3. Visit pages until the frontier is exhausted
/// 4. Return the crawl report
///
/// # Example
///
/// ```no_run
/// use site_mirror::{mirror, Config};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let report = mirror(Config::default(), "http://example.com/").await?;
/// println!("{} pages visited", report.pages_visited);
/// # Ok(())
/// # }
/// ```
pub async fn mirror(config: Config, root_url: &str) -> Result<CrawlReport> {
    let mut coordinator = Coordinator::new(config, root_url)?;
    coordinator.run().await
}
