//! Crawl report
//!
//! Counters collected by the coordinator while mirroring, and a plain-text
//! rendering for the command line.

use chrono::{DateTime, Utc};
use std::path::PathBuf;

/// Summary of one mirroring run
#[derive(Debug, Clone)]
pub struct CrawlReport {
    /// The root page the run started from
    pub root_url: String,

    /// Root directory of the mirror
    pub output_dir: PathBuf,

    /// Hash of the configuration file, when one was used
    pub config_hash: Option<String>,

    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,

    /// Pages taken off the frontier (saved or failed)
    pub pages_visited: u64,

    /// Page files written to disk
    pub pages_saved: u64,

    /// Pages abandoned after a fetch failure
    pub pages_failed: u64,

    /// Pages fetched and processed whose file could not be written
    pub page_write_failures: u64,

    /// Assets fetched and written
    pub assets_downloaded: u64,

    /// Assets skipped because a file already existed
    pub assets_present: u64,

    /// Assets that could not be fetched or written
    pub asset_failures: u64,

    /// Total bytes written for assets
    pub bytes_downloaded: u64,

    /// References that could not be resolved to a fetchable URL
    pub references_skipped: u64,

    /// Same-host links added to the frontier
    pub links_queued: u64,

    /// Pages still in the frontier when the run stopped
    pub frontier_remaining: u64,
}

impl CrawlReport {
    pub fn new(root_url: impl Into<String>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_url: root_url.into(),
            output_dir: output_dir.into(),
            config_hash: None,
            started_at: Utc::now(),
            finished_at: None,
            pages_visited: 0,
            pages_saved: 0,
            pages_failed: 0,
            page_write_failures: 0,
            assets_downloaded: 0,
            assets_present: 0,
            asset_failures: 0,
            bytes_downloaded: 0,
            references_skipped: 0,
            links_queued: 0,
            frontier_remaining: 0,
        }
    }

    /// Stamps the finish time and records what was left unvisited
    pub fn finish(&mut self, frontier_remaining: usize) {
        self.finished_at = Some(Utc::now());
        self.frontier_remaining = frontier_remaining as u64;
    }

    /// Run duration in seconds, once finished
    pub fn duration_seconds(&self) -> Option<i64> {
        self.finished_at
            .map(|finished| (finished - self.started_at).num_seconds())
    }

    /// True if every visited page and every asset was handled
    pub fn is_complete(&self) -> bool {
        self.pages_failed == 0
            && self.page_write_failures == 0
            && self.asset_failures == 0
            && self.frontier_remaining == 0
    }
}

/// Prints the report to stdout
pub fn print_report(report: &CrawlReport) {
    println!("=== Mirror Summary ===\n");

    println!("Root URL: {}", report.root_url);
    println!("Output: {}", report.output_dir.display());
    if let Some(hash) = &report.config_hash {
        println!("Config hash: {}", hash);
    }
    println!("Started: {}", report.started_at.to_rfc3339());
    if let (Some(finished), Some(seconds)) = (report.finished_at, report.duration_seconds()) {
        println!("Finished: {} ({}s)", finished.to_rfc3339(), seconds);
    }
    println!();

    println!("Pages:");
    println!("  Visited: {}", report.pages_visited);
    println!("  Saved: {}", report.pages_saved);
    println!("  Failed: {}", report.pages_failed);
    println!("  Not written: {}", report.page_write_failures);
    println!("  Links queued: {}", report.links_queued);
    if report.frontier_remaining > 0 {
        println!("  Left in frontier: {}", report.frontier_remaining);
    }
    println!();

    println!("Assets:");
    println!(
        "  Downloaded: {} ({} bytes)",
        report.assets_downloaded, report.bytes_downloaded
    );
    println!("  Already present: {}", report.assets_present);
    println!("  Failed: {}", report.asset_failures);
    println!("  Skipped references: {}", report.references_skipped);
    println!();

    if report.is_complete() {
        println!("✓ Mirror complete");
    } else {
        println!("✗ Mirror incomplete, see warnings above");
    }
}
