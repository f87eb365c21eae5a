use crate::state::CrawlPhase;
use crate::{Result, ScrapeError};
use std::collections::HashSet;
use std::fmt;
use url::Url;

/// Why the crawl loop stopped
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Termination {
    /// The last page had no next link
    NoNextPage,

    /// The next link pointed at a page already visited in this crawl
    RevisitedUrl { url: String },

    /// The configured page limit was reached
    PageLimit { limit: u32 },

    /// A denial marker was found on a page
    Blocked { url: String, marker: String },

    /// A fetch or write failed
    Fatal { url: String, cause: String },
}

impl Termination {
    /// The terminal phase this cause leads to
    pub fn phase(&self) -> CrawlPhase {
        match self {
            Self::NoNextPage | Self::RevisitedUrl { .. } | Self::PageLimit { .. } => {
                CrawlPhase::Done
            }
            Self::Blocked { .. } => CrawlPhase::Blocked,
            Self::Fatal { .. } => CrawlPhase::Fatal,
        }
    }

    /// Returns true if the crawl stopped on an error
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Fatal { .. })
    }
}

impl fmt::Display for Termination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoNextPage => write!(f, "no more pages"),
            Self::RevisitedUrl { url } => write!(f, "next page {} was already visited", url),
            Self::PageLimit { limit } => write!(f, "page limit of {} reached", limit),
            Self::Blocked { url, marker } => write!(f, "blocked at {} ('{}')", url, marker),
            Self::Fatal { url, cause } => write!(f, "failed at {}: {}", url, cause),
        }
    }
}

/// Transient state of one crawl, owned by the coordinator
#[derive(Debug)]
pub struct CrawlState {
    current_url: Url,
    page_number: u32,
    records_written: u64,
    faults_skipped: u64,
    visited: HashSet<String>,
    phase: CrawlPhase,
    termination: Option<Termination>,
}

impl CrawlState {
    /// Starts a crawl at `start_url`, on page 1, about to fetch
    pub fn new(start_url: Url) -> Self {
        let mut visited = HashSet::new();
        visited.insert(start_url.to_string());

        Self {
            current_url: start_url,
            page_number: 1,
            records_written: 0,
            faults_skipped: 0,
            visited,
            phase: CrawlPhase::Fetching,
            termination: None,
        }
    }

    pub fn current_url(&self) -> &Url {
        &self.current_url
    }

    pub fn page_number(&self) -> u32 {
        self.page_number
    }

    pub fn records_written(&self) -> u64 {
        self.records_written
    }

    pub fn faults_skipped(&self) -> u64 {
        self.faults_skipped
    }

    pub fn phase(&self) -> CrawlPhase {
        self.phase
    }

    pub fn termination(&self) -> Option<&Termination> {
        self.termination.as_ref()
    }

    /// Moves to `next`, rejecting moves the phase graph does not allow
    pub fn advance_to(&mut self, next: CrawlPhase) -> Result<()> {
        if !self.phase.can_transition_to(next) {
            return Err(ScrapeError::InvalidTransition {
                from: self.phase,
                to: next,
            });
        }

        tracing::trace!("Phase {} -> {}", self.phase, next);
        self.phase = next;
        Ok(())
    }

    /// Enters the terminal phase for `cause` and records the cause
    pub fn terminate(&mut self, cause: Termination) -> Result<()> {
        self.advance_to(cause.phase())?;
        self.termination = Some(cause);
        Ok(())
    }

    /// Returns true if `url` was already fetched (or queued) in this crawl
    pub fn has_visited(&self, url: &Url) -> bool {
        self.visited.contains(url.as_str())
    }

    /// Points the crawl at the next page and enters `Fetching`
    pub fn begin_page(&mut self, url: Url) -> Result<()> {
        self.advance_to(CrawlPhase::Fetching)?;
        self.visited.insert(url.to_string());
        self.current_url = url;
        self.page_number += 1;
        Ok(())
    }

    pub fn record_written(&mut self) {
        self.records_written += 1;
    }

    pub fn record_fault(&mut self) {
        self.faults_skipped += 1;
    }
}
