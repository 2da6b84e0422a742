//! Output module for reporting crawl results

mod report;

pub use report::{print_report, CrawlReport};
