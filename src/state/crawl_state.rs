//! Frontier and visited-set bookkeeping for one mirroring run

use crate::url::{strip_fragment, RootHost};
use crate::UrlResult;
use std::collections::{HashSet, VecDeque};
use url::Url;

/// Crawl state shared by every page visit of a run
///
/// Owned by the coordinator and passed by reference; nothing else mutates
/// it. URLs are keyed without their fragment, and same-host URLs are keyed
/// under the root URL's scheme, so `http://root/` and `https://root/` are
/// one page.
///
/// Invariants:
/// - a URL enters the frontier at most once per run and only if it is on
///   the root host and not yet visited
/// - `visited` only grows
/// - after [`CrawlState::mark_visited`] returns, the URL is no longer in the
///   frontier
#[derive(Debug, Clone)]
pub struct CrawlState {
    root: RootHost,

    /// Scheme of the root URL, `http` or `https`
    scheme: String,

    /// Visit order; may hold stale entries that were visited some other way
    frontier: VecDeque<Url>,

    /// Live frontier membership
    queued: HashSet<Url>,

    /// Pages fetched and assets downloaded (or found on disk)
    visited: HashSet<Url>,

    /// Subset of `visited` that was abandoned after an error
    failed: HashSet<Url>,
}

impl CrawlState {
    /// Creates the state for a run rooted at `root_url`, with the root page
    /// as the only frontier entry
    pub fn new(root_url: &Url) -> UrlResult<Self> {
        let root = RootHost::from_url(root_url)?;
        let mut state = Self {
            root,
            scheme: root_url.scheme().to_string(),
            frontier: VecDeque::new(),
            queued: HashSet::new(),
            visited: HashSet::new(),
            failed: HashSet::new(),
        };
        state.enqueue(root_url);
        Ok(state)
    }

    pub fn root_host(&self) -> &RootHost {
        &self.root
    }

    /// Adds a page link to the frontier
    ///
    /// Returns false (and does nothing) when the URL is on another host,
    /// already visited, or already queued.
    pub fn enqueue(&mut self, url: &Url) -> bool {
        if !self.root.matches(url) {
            return false;
        }
        let key = self.key(url);
        if self.visited.contains(&key) || self.queued.contains(&key) {
            return false;
        }
        self.queued.insert(key.clone());
        self.frontier.push_back(key);
        true
    }

    /// Takes the next page to visit off the frontier
    pub fn next(&mut self) -> Option<Url> {
        while let Some(url) = self.frontier.pop_front() {
            if self.queued.remove(&url) {
                return Some(url);
            }
        }
        None
    }

    pub fn is_visited(&self, url: &Url) -> bool {
        self.visited.contains(&self.key(url))
    }

    /// Records a page or asset as visited
    ///
    /// Returns true if it had not been visited before.
    pub fn mark_visited(&mut self, url: &Url) -> bool {
        let key = self.key(url);
        self.queued.remove(&key);
        self.visited.insert(key)
    }

    /// Records a page as visited but abandoned
    pub fn mark_failed(&mut self, url: &Url) {
        let key = self.key(url);
        self.mark_visited(&key);
        self.failed.insert(key);
    }

    pub fn is_failed(&self, url: &Url) -> bool {
        self.failed.contains(&self.key(url))
    }

    /// Returns the number of pages still waiting in the frontier
    pub fn frontier_len(&self) -> usize {
        self.queued.len()
    }

    pub fn visited_len(&self) -> usize {
        self.visited.len()
    }

    pub fn failed_len(&self) -> usize {
        self.failed.len()
    }

    /// Bookkeeping key: fragment dropped, same-host URLs moved onto the
    /// root scheme
    fn key(&self, url: &Url) -> Url {
        let mut key = strip_fragment(url);
        if self.root.matches(&key) && key.scheme() != self.scheme {
            // http and https are both special schemes, so this cannot fail
            let _ = key.set_scheme(&self.scheme);
        }
        key
    }

    /// Pages still waiting in the frontier, in visit order
    pub fn pending(&self) -> impl Iterator<Item = &Url> {
        self.frontier.iter().filter(|url| self.queued.contains(*url))
    }
}
