/// Page state definitions for tracking a single page visit
///
/// A visit walks `Pending -> Fetching -> Extracting -> Persisting ->
/// Expanding -> Done`. Any in-flight state may instead end in `Failed`.
use crate::MirrorError;
use std::fmt;
use url::Url;

/// Represents the current state of a page visit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageState {
    // ===== Active States =====
    /// Page is in the frontier, waiting to be visited
    Pending,

    /// Page HTML is being downloaded
    Fetching,

    /// Asset and anchor references are being pulled from the markup
    Extracting,

    /// Page file and its assets are being written to disk
    Persisting,

    /// Same-host links are being merged into the frontier
    Expanding,

    // ===== Terminal States =====
    /// Page was fully processed
    Done,

    /// Page was abandoned after a recoverable error
    Failed,
}

impl PageState {
    /// Returns true if a visit may move from `self` to `next`
    pub fn can_transition_to(&self, next: PageState) -> bool {
        use PageState::*;
        match (self, next) {
            (Pending, Fetching) => true,
            (Fetching, Extracting) => true,
            (Extracting, Persisting) => true,
            (Persisting, Expanding) => true,
            (Expanding, Done) => true,
            (Fetching | Extracting | Persisting | Expanding, Failed) => true,
            _ => false,
        }
    }

    /// Returns the lowercase name used in log output
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Fetching => "fetching",
            Self::Extracting => "extracting",
            Self::Persisting => "persisting",
            Self::Expanding => "expanding",
            Self::Done => "done",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for PageState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One page moving through the visit state machine
#[derive(Debug, Clone)]
pub struct PageVisit {
    url: Url,
    state: PageState,
}

impl PageVisit {
    pub fn new(url: Url) -> Self {
        Self {
            url,
            state: PageState::Pending,
        }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn state(&self) -> PageState {
        self.state
    }

    /// Moves the visit to `next`
    ///
    /// An illegal transition is a programming error and is reported as
    /// [`MirrorError::InvalidTransition`], which the driver never recovers.
    pub fn advance(&mut self, next: PageState) -> Result<(), MirrorError> {
        if !self.state.can_transition_to(next) {
            return Err(MirrorError::InvalidTransition {
                from: self.state,
                to: next,
            });
        }
        tracing::trace!("{}: {} -> {}", self.url, self.state, next);
        self.state = next;
        Ok(())
    }
}
