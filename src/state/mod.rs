//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `CrawlState`: the frontier of same-host pages still to visit and the set
//!   of pages and assets already handled
//! - `PageState` / `PageVisit`: the state machine a single page visit walks

mod crawl_state;
mod page_state;

// Re-export main types
pub use crawl_state::CrawlState;
pub use page_state::{PageState, PageVisit};
